use thiserror::Error;

/// Errors that can occur while registering or unregistering client objects
///
/// Every variant signals a protocol violation: the authoritative side
/// created an id twice, destroyed it twice, or destroyed it before creating it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Id is already bound to a live object
    #[error("Object id {id} is already registered")]
    IdAlreadyRegistered { id: String },

    /// Object is already bound to another id
    #[error("Object cannot be registered as {id}: it is already registered as {existing_id}")]
    ObjectAlreadyRegistered { id: String, existing_id: String },

    /// Id is not bound to any object
    #[error("Object id {id} is not registered")]
    IdNotRegistered { id: String },
}
