use thiserror::Error;

/// Errors surfaced by the match session engine.
///
/// Redundant or out-of-order calls are not errors; they are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Malformed start parameters. No session is created.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The chosen option does not exist for the current question.
    /// Session state is left untouched.
    #[error("option {option} is out of range (question has {available} options)")]
    InvalidOption { option: usize, available: usize },
}
