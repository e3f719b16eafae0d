pub mod error;
pub mod message_processor;
pub mod report;
