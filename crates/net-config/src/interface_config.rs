//! In-memory configuration of a single interface

use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;

use ifcfg_network_core::error::ValidationError;
use ifcfg_network_core::{
    BootProto, KEY_BOOTPROTO, KEY_DNS1, KEY_DNS2, KEY_DOMAIN, KEY_GATEWAY, KEY_IPADDR,
    KEY_NETMASK, STATIC_ONLY_KEYS,
};
use ifcfg_network_validate::validate_ip;

/// Ordered key/value settings of one ifcfg file.
///
/// Keys keep the position they were first inserted at. Updating an existing
/// key changes its value in place; new keys are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InterfaceConfig {
    entries: IndexMap<String, String>,
}

impl InterfaceConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set a key, keeping its position if it already exists
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove a key without disturbing the order of the others
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Iterate entries in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current addressing mode, if BOOTPROTO holds a known value
    pub fn boot_proto(&self) -> Option<BootProto> {
        self.get(KEY_BOOTPROTO)?.parse().ok()
    }

    /// Switch to static addressing with the given address
    pub fn set_address(&mut self, ip: &str) -> Result<(), ValidationError> {
        validate_ip(ip)?;
        self.set(KEY_BOOTPROTO, BootProto::Static.as_str());
        self.set(KEY_IPADDR, ip);
        Ok(())
    }

    pub fn set_gateway(&mut self, ip: &str) -> Result<(), ValidationError> {
        validate_ip(ip)?;
        self.set(KEY_GATEWAY, ip);
        Ok(())
    }

    /// Set the netmask. Only IP literal syntax is checked, not contiguity.
    pub fn set_netmask(&mut self, mask: &str) -> Result<(), ValidationError> {
        validate_ip(mask)?;
        self.set(KEY_NETMASK, mask);
        Ok(())
    }

    /// Set up to two name servers.
    ///
    /// `DNS1` is always written, blank when `servers` is empty, which drops it
    /// from the generated file. `DNS2` is only touched when a second server is
    /// given. Servers past the second are ignored.
    pub fn set_dns<S: AsRef<str>>(&mut self, servers: &[S]) {
        let first = servers.first().map(|s| s.as_ref()).unwrap_or("");
        self.set(KEY_DNS1, first);

        if let Some(second) = servers.get(1) {
            self.set(KEY_DNS2, second.as_ref());
        }

        if servers.len() > 2 {
            warn!(
                "Only two DNS servers are supported, ignoring {} extra",
                servers.len() - 2
            );
        }
    }

    /// Set the DNS search list as a quoted, space separated `DOMAIN` value
    pub fn set_search_order<S: AsRef<str>>(&mut self, domains: &[S]) {
        let joined = domains
            .iter()
            .map(|d| d.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        self.set(KEY_DOMAIN, format!("\"{}\"", joined));
    }

    /// Switch to DHCP and drop every static addressing key
    pub fn enable_dhcp(&mut self) {
        self.set(KEY_BOOTPROTO, BootProto::Dhcp.as_str());
        for key in STATIC_ONLY_KEYS {
            if self.remove(key).is_some() {
                debug!("Removed {} for DHCP addressing", key);
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InterfaceConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (key, value) in iter {
            config.set(key, value);
        }
        config
    }
}
