//! Mapping from interface names to ifcfg file paths

use std::path::{Path, PathBuf};

use ifcfg_network_core::Result;
use ifcfg_network_validate::SyntaxValidator;

/// Default location of ifcfg files
pub const DEFAULT_CONFIG_DIR: &str = "/etc/sysconfig/network-scripts";

/// File name prefix of ifcfg files
pub const IFCFG_PREFIX: &str = "ifcfg-";

/// Resolves the configuration file that belongs to an interface
pub trait PathResolver: Send + Sync {
    fn resolve(&self, interface: &str) -> Result<PathBuf>;
}

/// Resolver for `<dir>/ifcfg-<name>` layouts
pub struct IfcfgPathResolver {
    config_dir: PathBuf,
    validator: SyntaxValidator,
}

impl IfcfgPathResolver {
    /// Create resolver for the default network-scripts directory
    pub fn new() -> Self {
        Self::with_dir(DEFAULT_CONFIG_DIR)
    }

    /// Create resolver rooted at a custom directory
    pub fn with_dir<P: AsRef<Path>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
            validator: SyntaxValidator::new(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

impl PathResolver for IfcfgPathResolver {
    fn resolve(&self, interface: &str) -> Result<PathBuf> {
        self.validator.validate_interface_name(interface)?;
        Ok(self
            .config_dir
            .join(format!("{}{}", IFCFG_PREFIX, interface)))
    }
}

impl Default for IfcfgPathResolver {
    fn default() -> Self {
        Self::new()
    }
}
