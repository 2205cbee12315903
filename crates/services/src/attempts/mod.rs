//! The practice-attempt core: the per-question state machine and the
//! service loop that keeps it synchronized with the remote attempt record.

mod machine;
mod progress;
mod service;

pub use machine::{AttemptMachine, QuestionState};
pub use progress::AttemptProgress;
pub use service::{AttemptLoopService, AttemptOutcome, PracticeAttempt};
