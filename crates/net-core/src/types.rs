//! Shared ifcfg vocabulary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Addressing mode selector
pub const KEY_BOOTPROTO: &str = "BOOTPROTO";
pub const KEY_IPADDR: &str = "IPADDR";
pub const KEY_NETMASK: &str = "NETMASK";
pub const KEY_GATEWAY: &str = "GATEWAY";
pub const KEY_PREFIX: &str = "PREFIX";
pub const KEY_DNS1: &str = "DNS1";
pub const KEY_DNS2: &str = "DNS2";
pub const KEY_DOMAIN: &str = "DOMAIN";
pub const KEY_NM_CONTROLLED: &str = "NM_CONTROLLED";

/// Keys that only make sense for static addressing; dropped when switching to DHCP
pub const STATIC_ONLY_KEYS: [&str; 7] = [
    KEY_IPADDR,
    KEY_NETMASK,
    KEY_GATEWAY,
    KEY_PREFIX,
    KEY_DNS1,
    KEY_DNS2,
    KEY_DOMAIN,
];

/// Comment marker for ifcfg files
pub const COMMENT_PREFIX: char = '#';

/// Addressing mode of an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootProto {
    Static,
    Dhcp,
}

impl BootProto {
    pub fn as_str(&self) -> &'static str {
        match self {
            BootProto::Static => "static",
            BootProto::Dhcp => "dhcp",
        }
    }
}

impl fmt::Display for BootProto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BootProto {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_matches('"').to_lowercase().as_str() {
            "static" | "none" => Ok(BootProto::Static),
            "dhcp" => Ok(BootProto::Dhcp),
            _ => Err(ConfigError::InvalidValue {
                field: KEY_BOOTPROTO.to_string(),
                value: s.to_string(),
            }),
        }
    }
}
