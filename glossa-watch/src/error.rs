//! Error types for task watching

use thiserror::Error;

/// Failures surfaced by the coordination layer
///
/// Every failure is local to the operation that triggered it; none of them
/// leave the controller in an unusable state.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Task creation was rejected or never reached the backend
    #[error("Failed to submit task: {0}")]
    Submission(String),

    /// Results or the task list could not be fetched
    #[error("Failed to fetch {what}: {message}")]
    Fetch { what: &'static str, message: String },

    /// The backend did not create a session
    #[error("Failed to create session: {0}")]
    SessionCreation(String),

    /// The task form is incomplete
    #[error("Please fill in all fields (missing: {})", .0.join(", "))]
    InvalidTask(Vec<&'static str>),

    /// No session id is known
    #[error("No active session; create one first")]
    NoSession,

    /// No task matches the given id or prefix
    #[error("No task found with ID starting with '{0}'")]
    UnknownTask(String),

    /// Several tasks match the given prefix
    #[error("Ambiguous prefix '{prefix}' matches multiple tasks: {}", .matches.join(", "))]
    AmbiguousTask {
        prefix: String,
        matches: Vec<String>,
    },
}
