pub mod handlers;
pub mod model;
pub mod synchronizer;
pub mod tree;
