//! ifcfg network configuration
//!
//! Parsing and generation of per-interface ifcfg files, the in-memory
//! configuration model, and the storage collaborators used to persist it

pub mod ifcfg;
pub mod interface_config;
pub mod path;
pub mod store;

#[cfg(test)]
mod tests;

pub use ifcfg::IfcfgParser;
pub use interface_config::InterfaceConfig;
pub use path::{IfcfgPathResolver, PathResolver, DEFAULT_CONFIG_DIR};
pub use store::{FileStore, LocalFileStore};
