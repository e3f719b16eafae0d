pub mod capability;
pub mod client_object;
pub mod error;
pub mod object_registry;
