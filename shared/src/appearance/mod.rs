pub mod appearance_cache;
pub mod error;
pub mod state_set;
pub mod theme;
