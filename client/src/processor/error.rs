use thiserror::Error;

use widget_sync_shared::{Action, DecodeError, HandlerError, RegistryError};

/// Protocol violations and failures while applying a single inbound
/// operation. None of them abort the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// `create` names a type without a registered handler
    #[error("Cannot create {target}: no handler for type {type_name}")]
    UnknownType { target: String, type_name: String },

    /// Operation addresses an id that is not registered
    #[error("Cannot {operation} {target}: object is not registered")]
    UnknownTarget { target: String, operation: Action },

    /// `set` carried properties the handler does not declare (strict mode)
    #[error("Object {target} does not declare properties {properties:?}")]
    UnknownProperty {
        target: String,
        properties: Vec<String>,
    },

    /// `listen` named events the handler does not declare (strict mode)
    #[error("Object {target} does not declare events {events:?}")]
    UnknownEvent { target: String, events: Vec<String> },

    /// Object is mutably borrowed elsewhere and cannot be handled
    #[error("Object {target} is in use and cannot be borrowed")]
    ObjectBusy { target: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Factory, applier, method or destructor failed
    #[error("Handler failed on {target}: {source}")]
    Handler {
        target: String,
        #[source]
        source: HandlerError,
    },

    /// Array element that is not a well-formed operation
    #[error(transparent)]
    Undecodable(#[from] DecodeError),
}
