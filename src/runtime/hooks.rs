use anyhow::Error as AnyError;

/// Outcome of a task that can be interrupted by the shutdown token.
pub(crate) enum TaskDecision {
    Finished(Result<(), AnyError>),
    Cancelled,
}
