pub mod error;
pub mod operation;
pub mod outbound;
