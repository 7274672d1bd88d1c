use crate::{AgentRequest, Effect, Msg, Session};

/// Pure update function: applies a message to the session and returns any effects.
pub fn update(mut session: Session, msg: Msg) -> (Session, Vec<Effect>) {
    let effects = match msg {
        Msg::OnboardingRequested => {
            if session.mark_onboarding_requested() {
                vec![Effect::ShowOnboarding]
            } else {
                Vec::new()
            }
        }
        Msg::PromptSubmitted { prompt, image_path } => {
            match AgentRequest::new(prompt, image_path) {
                Ok(request) => {
                    let job_id = session.enqueue(request.clone());
                    vec![Effect::RunAgent { job_id, request }]
                }
                Err(error) => vec![Effect::RejectPrompt { error }],
            }
        }
        Msg::RunCompleted { job_id, result } => {
            session.complete(job_id, result);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (session, effects)
}
