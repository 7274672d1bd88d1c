mod app;
mod cli;
mod effects;

use std::process::ExitCode;

use clap::Parser;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    agent_logging::initialize(cli.log_destination(), cli.log_level());
    app::run(cli)
}
