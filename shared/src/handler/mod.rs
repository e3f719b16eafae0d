pub mod error;
pub mod handler_context;
pub mod handler_registry;
pub mod type_handler;
pub mod value;
