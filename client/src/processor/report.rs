use widget_sync_shared::RemoteId;

use crate::processor::error::ProtocolError;

/// One operation of a batch that was skipped or only partly applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFailure {
    /// Position of the operation in the batch
    pub index: usize,
    /// `None` when the operation could not be decoded
    pub target: Option<RemoteId>,
    pub error: ProtocolError,
}

/// Outcome of processing one inbound batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    applied: usize,
    failures: Vec<OperationFailure>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_applied(&mut self) {
        self.applied += 1;
    }

    pub(crate) fn record_failure(
        &mut self,
        index: usize,
        target: Option<RemoteId>,
        error: ProtocolError,
    ) {
        self.failures.push(OperationFailure {
            index,
            target,
            error,
        });
    }

    /// Number of operations applied without error
    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn failures(&self) -> &[OperationFailure] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
