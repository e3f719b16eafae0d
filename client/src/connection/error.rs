use thiserror::Error;

use widget_sync_shared::HandlerError;

/// Errors returned by the local (non-protocol) API of a Connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("Object {id} is not registered")]
    UnknownObject { id: String },

    #[error("Object {id} is not a {expected}")]
    WrongObjectType { id: String, expected: &'static str },

    /// Object is already mutably borrowed, typically by a running handler
    #[error("Object {id} is in use and cannot be borrowed")]
    ObjectBusy { id: String },

    #[error("Object {id} does not implement {capability}")]
    MissingCapability {
        id: String,
        capability: &'static str,
    },

    #[error("Object {id} has no scripting method {method}")]
    UnknownScriptingMethod { id: String, method: String },

    #[error("Handler of object {id} failed: {source}")]
    Handler {
        id: String,
        #[source]
        source: HandlerError,
    },
}
