use thiserror::Error;

/// Errors that can occur while decoding inbound batches
///
/// A batch that is not a JSON array is rejected as a whole; a single
/// operation that does not decode only invalidates that operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Message text is not valid JSON
    #[error("Batch is not valid JSON: {reason}")]
    MalformedJson { reason: String },

    /// Message decoded, but is not an array of operations
    #[error("Batch must be an array of operations, found {found}")]
    NotABatch { found: &'static str },

    /// One operation inside an otherwise valid batch is malformed
    #[error("Operation #{index} could not be decoded: {reason}")]
    MalformedOperation { index: usize, reason: String },
}
