//! CLI commands

pub mod apply;
pub mod show;

pub use apply::{ApplyCommand, InterfaceChange, StaticAddressing};
pub use show::{OutputFormat, ShowCommand};

use std::sync::Arc;

use anyhow::{Context, Result};

use ifcfg_network_apply::{IfUpDownController, InterfaceApplier};
use ifcfg_network_config::{IfcfgPathResolver, LocalFileStore};

use crate::settings::Settings;

/// Open an interface with the collaborators described by `settings`
pub async fn open_interface(settings: &Settings, interface: &str) -> Result<InterfaceApplier> {
    let resolver = IfcfgPathResolver::with_dir(&settings.config_dir);
    let service = IfUpDownController::with_config(
        settings.ifup_path.clone(),
        settings.ifdown_path.clone(),
        settings.command_timeout(),
    );

    let applier = InterfaceApplier::open(
        interface,
        &resolver,
        Arc::new(LocalFileStore::new()),
        Arc::new(service),
    )
    .await
    .with_context(|| format!("Failed to load configuration for interface {}", interface))?;

    Ok(match &settings.transaction_log_dir {
        Some(dir) => applier.with_transaction_log_dir(dir),
        None => applier,
    })
}
