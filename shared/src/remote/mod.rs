pub mod error;
pub mod outbound_channel;
pub mod remote_object;
