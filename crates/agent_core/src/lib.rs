//! Agent core: request validation, outcome classification, fallback policy,
//! message normalization, and the pure session state machine.
mod classify;
mod effect;
mod fallback;
mod message;
mod msg;
mod normalize;
mod outcome;
mod request;
mod resolve;
mod session;
mod update;

pub use classify::{classify, PARSE_FAILURE_PREFIX};
pub use effect::Effect;
pub use fallback::{
    classify_failure, failure_result, FailureClass, FALLBACK_STATUS_TEXT,
    HARD_FAILURE_STATUS_TEXT,
};
pub use message::{
    AgentRunResult, Attachment, AttachmentKind, DisplayMessage, Emphasis, Role, RunStatus,
    StatusKind,
};
pub use msg::Msg;
pub use normalize::{
    normalize_messages, success_result, DEFAULT_PREVIEW_NAME, EMPTY_RUN_MESSAGE,
    ERROR_NOTE_PREFIX, FEEDBACK_PREFIX, PLAN_PREFIX, SUCCESS_STATUS_TEXT,
};
pub use outcome::{AgentOutcome, AgentSuccess, PreviewImage, RawProcessOutcome, Steps};
pub use request::{AgentRequest, RequestError};
pub use resolve::resolve_outcome;
pub use session::{JobId, Session};
pub use update::update;
