use super::{FocusOutcome, ItemStatus, RunResult};
use crate::error::StepError;

/// Progress notifications published while a batch runs.
#[derive(Debug, Clone)]
pub enum RunEvent {
    BatchStarted { count: usize, first: usize, last: usize },
    ItemStarted { position: usize, total: usize, id: String, name: String },
    StepStarted(String),
    WindowFocus(FocusOutcome),
    ItemFinished { id: String, outcome: Result<ItemStatus, StepError> },
    Finished(RunResult),
}
