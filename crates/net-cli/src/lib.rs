//! ifcfg network CLI
//!
//! Command-line front end for inspecting and changing a single interface's
//! ifcfg file. Every change is applied transactionally: the interface is
//! restarted and the previous file restored if it does not come back up.

pub mod commands;
pub mod settings;


pub use settings::{Settings, SettingsError};
