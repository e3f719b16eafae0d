use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{messages::error::DecodeError, Properties, RemoteId, Value};

/// One inbound instruction from the authoritative side
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Operation {
    Create {
        target: RemoteId,
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default)]
        properties: Properties,
    },
    Set {
        target: RemoteId,
        #[serde(default)]
        properties: Properties,
    },
    Listen {
        target: RemoteId,
        #[serde(default)]
        events: IndexMap<String, bool>,
    },
    Call {
        target: RemoteId,
        method: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    Destroy {
        target: RemoteId,
    },
}

impl Operation {
    pub fn create(target: impl Into<RemoteId>, type_name: &str, properties: Properties) -> Self {
        Self::Create {
            target: target.into(),
            type_name: type_name.to_string(),
            properties,
        }
    }

    pub fn set(target: impl Into<RemoteId>, properties: Properties) -> Self {
        Self::Set {
            target: target.into(),
            properties,
        }
    }

    pub fn listen(target: impl Into<RemoteId>, events: &[(&str, bool)]) -> Self {
        Self::Listen {
            target: target.into(),
            events: events
                .iter()
                .map(|(name, enabled)| (name.to_string(), *enabled))
                .collect(),
        }
    }

    pub fn call(target: impl Into<RemoteId>, method: &str, args: Vec<Value>) -> Self {
        Self::Call {
            target: target.into(),
            method: method.to_string(),
            args,
        }
    }

    pub fn destroy(target: impl Into<RemoteId>) -> Self {
        Self::Destroy {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &RemoteId {
        match self {
            Operation::Create { target, .. }
            | Operation::Set { target, .. }
            | Operation::Listen { target, .. }
            | Operation::Call { target, .. }
            | Operation::Destroy { target } => target,
        }
    }

    pub fn action(&self) -> Action {
        match self {
            Operation::Create { .. } => Action::Create,
            Operation::Set { .. } => Action::Set,
            Operation::Listen { .. } => Action::Listen,
            Operation::Call { .. } => Action::Call,
            Operation::Destroy { .. } => Action::Destroy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Set,
    Listen,
    Call,
    Destroy,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Set => "set",
            Action::Listen => "listen",
            Action::Call => "call",
            Action::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered list of inbound operations.
///
/// Operations that failed to decode keep their slot so that the processor
/// can report them by position and still apply the rest of the batch.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    entries: Vec<Result<Operation, DecodeError>>,
}

impl Batch {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            entries: operations.into_iter().map(Ok).collect(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(text).map_err(|error| DecodeError::MalformedJson {
                reason: error.to_string(),
            })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let Value::Array(items) = value else {
            return Err(DecodeError::NotABatch {
                found: value_kind(&value),
            });
        };

        let entries = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<Operation>(item).map_err(|error| {
                    DecodeError::MalformedOperation {
                        index,
                        reason: error.to_string(),
                    }
                })
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn push(&mut self, operation: Operation) -> &mut Self {
        self.entries.push(Ok(operation));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Result<Operation, DecodeError>] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Result<Operation, DecodeError>> {
        self.entries
    }

    /// Encodes the decodable operations back into wire form
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let operations: Vec<&Operation> = self
            .entries
            .iter()
            .filter_map(|entry| entry.as_ref().ok())
            .collect();
        serde_json::to_string(&operations)
    }
}

impl From<Vec<Operation>> for Batch {
    fn from(operations: Vec<Operation>) -> Self {
        Self::new(operations)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
