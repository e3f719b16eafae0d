use thiserror::Error;

/// Errors raised by type handlers, either while they are being defined and
/// registered (contract violations, fatal at startup) or while one of their
/// appliers, methods or factories runs against a client object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    // Registration

    /// A handler with this type name was registered before
    #[error("Type handler {type_name} is already registered")]
    DuplicateType { type_name: String },

    /// Registry has been handed to a connection and can no longer change
    #[error("Cannot register {type_name}: the handler registry is locked")]
    RegistryLocked { type_name: String },

    /// Property is part of the declared order but has no applier
    #[error("Type handler {type_name} declares property {property} without an applier")]
    MissingApplier { type_name: String, property: String },

    /// Event name declared twice
    #[error("Type handler {type_name} declares event {event} more than once")]
    DuplicateEvent { type_name: String, event: String },

    // Application

    /// Applier or method received an object of an unexpected concrete type
    #[error("Expected an object of type {expected}")]
    WrongObjectType { expected: &'static str },

    /// Property or argument value has the wrong shape
    #[error("Invalid value for {property}: expected {expected}")]
    InvalidValue {
        property: String,
        expected: &'static str,
    },

    /// Factory needs a property that was not supplied
    #[error("Missing required property {property}")]
    MissingProperty { property: String },

    /// Generic setter convention used on an object that does not support it
    #[error("Object has no setter for property {property}")]
    NoSetter { property: String },

    /// Value references an id that is neither registered nor synthetic
    #[error("Reference to unknown object {id}")]
    UnknownReference { id: String },

    /// Referenced object is busy (already mutably borrowed)
    #[error("Object {id} is in use and cannot be borrowed")]
    ObjectBusy { id: String },
}
