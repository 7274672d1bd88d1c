use std::path::PathBuf;

use agent_logging::LogDestination;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "agent-run")]
#[command(about = "Run the vision agent once and print the conversation as JSON", long_about = None)]
pub struct Cli {
    /// What the agent should build or change
    #[arg(short, long)]
    pub prompt: String,

    /// Image to hand to the agent; it is staged in a temporary directory for the run
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Show the one-time onboarding note before running
    #[arg(long)]
    pub onboarding: bool,

    /// Pretty-print the JSON result
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
