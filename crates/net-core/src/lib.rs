//! ifcfg network core
//!
//! Error taxonomy and shared vocabulary for per-interface ifcfg files

pub mod error;
pub mod types;

pub use error::NetworkError;
pub use types::*;

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;
