//! Apply command

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;

use ifcfg_network_apply::{InterfaceApplier, TransactionState};

use crate::commands::open_interface;
use crate::settings::Settings;

/// A single setting change requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceChange {
    Address(String),
    Gateway(String),
    Netmask(String),
    Dns(Vec<String>),
    Search(Vec<String>),
    Dhcp,
}

/// Full static addressing for `ifcfgctl static`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAddressing {
    pub address: String,
    pub netmask: String,
    pub gateway: String,
    pub dns: Vec<String>,
    pub search: Option<Vec<String>>,
}

/// Apply command implementation
pub struct ApplyCommand {
    settings: Arc<Settings>,
}

impl ApplyCommand {
    /// Create new apply command
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Change one setting and restart the interface
    pub async fn execute(&self, interface: &str, change: InterfaceChange) -> Result<()> {
        let mut applier = open_interface(&self.settings, interface).await?;

        info!("Applying {:?} to interface {}", change, interface);
        match change {
            InterfaceChange::Address(ip) => applier.set_address(&ip)?,
            InterfaceChange::Gateway(ip) => applier.set_gateway(&ip)?,
            InterfaceChange::Netmask(mask) => applier.set_netmask(&mask)?,
            InterfaceChange::Dns(servers) => applier.set_dns(&servers),
            InterfaceChange::Search(domains) => applier.set_search_order(&domains),
            InterfaceChange::Dhcp => applier.enable_dhcp(),
        }

        let committed = applier
            .save()
            .await
            .context("Failed to save configuration")?;
        Self::report(&applier, committed)
    }

    /// Switch the interface to static addressing and restart it
    pub async fn execute_static(&self, interface: &str, addressing: StaticAddressing) -> Result<()> {
        let mut applier = open_interface(&self.settings, interface).await?;

        info!(
            "Applying static address {} to interface {}",
            addressing.address, interface
        );
        let committed = applier
            .apply_static(
                &addressing.address,
                &addressing.netmask,
                &addressing.gateway,
                &addressing.dns,
                addressing.search.as_deref(),
            )
            .await
            .context("Failed to apply static configuration")?;
        Self::report(&applier, committed)
    }

    fn report(applier: &InterfaceApplier, committed: bool) -> Result<()> {
        let interface = applier.interface();

        if !committed {
            match applier.last_transaction().map(|t| t.state) {
                Some(TransactionState::Aborted) => bail!(
                    "Could not bring down interface {}; configuration left unchanged",
                    interface
                ),
                _ => bail!(
                    "Interface {} did not come up with the new configuration; previous configuration restored",
                    interface
                ),
            }
        }

        println!("Configuration of {} applied", interface);
        Ok(())
    }
}
