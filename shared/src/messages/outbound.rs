use serde::{Deserialize, Serialize};

use crate::{Properties, RemoteId, Value};

/// One client-originated instruction destined for the authoritative side
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum OutboundOperation {
    Set {
        target: RemoteId,
        properties: Properties,
    },
    Call {
        target: RemoteId,
        method: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    Notify {
        target: RemoteId,
        event: String,
        #[serde(default)]
        properties: Properties,
    },
}

impl OutboundOperation {
    pub fn target(&self) -> &RemoteId {
        match self {
            OutboundOperation::Set { target, .. }
            | OutboundOperation::Call { target, .. }
            | OutboundOperation::Notify { target, .. } => target,
        }
    }
}

/// Everything staged since the previous flush, in send order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutboundBatch {
    operations: Vec<OutboundOperation>,
}

impl OutboundBatch {
    pub fn new(operations: Vec<OutboundOperation>) -> Self {
        Self { operations }
    }

    pub fn operations(&self) -> &[OutboundOperation] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<OutboundOperation> {
        self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations addressed to `target`, in send order
    pub fn operations_for<'a, 't>(
        &'a self,
        target: &'t str,
    ) -> impl Iterator<Item = &'a OutboundOperation> + 't
    where
        'a: 't,
    {
        self.operations
            .iter()
            .filter(move |operation| operation.target().as_str() == target)
    }

    /// Value of `property` on `target` as of the end of this batch, if
    /// any of its sets carries it
    pub fn property<'a>(&'a self, target: &str, property: &str) -> Option<&'a Value> {
        self.operations
            .iter()
            .rev()
            .find_map(|operation| match operation {
                OutboundOperation::Set {
                    target: set_target,
                    properties,
                } if set_target.as_str() == target => properties.get(property),
                _ => None,
            })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
