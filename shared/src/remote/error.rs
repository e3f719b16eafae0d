use thiserror::Error;

/// Errors that can occur while driving the outbound channel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutboundError {
    /// `resume()` without a matching `suspend()`
    #[error("Outbound channel cannot resume: it is not suspended")]
    NotSuspended,
}
