use std::{borrow::Borrow, fmt, ops::Deref};

use serde::{Deserialize, Serialize};

pub use serde_json::Value;

/// Property bag carried by `create`, `set` and `notify` operations.
/// Key order is preserved as received.
pub type Properties = serde_json::Map<String, Value>;

/// Logical milliseconds, as measured by a session [`Clock`](crate::Clock)
pub type Millis = u64;

/// Opaque, server-assigned identifier of one client-side object.
///
/// Unique for the lifetime of a session and never reused while the
/// referenced object is live.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of a child that has not been materialized (and therefore never
    /// registered) yet: `<parent>#<index>`
    pub fn synthetic(parent: &RemoteId, index: usize) -> Self {
        Self(format!("{}#{}", parent.0, index))
    }

    /// Splits a synthetic id back into its parent id and child index
    pub fn split_synthetic(&self) -> Option<(RemoteId, usize)> {
        let (parent, index) = self.0.rsplit_once('#')?;
        let index = index.parse::<usize>().ok()?;
        Some((RemoteId::new(parent), index))
    }

    pub fn is_synthetic(&self) -> bool {
        self.split_synthetic().is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for RemoteId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RemoteId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RemoteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RemoteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&RemoteId> for Value {
    fn from(id: &RemoteId) -> Self {
        Value::String(id.0.clone())
    }
}
