//! Syntax validation for interface names
//!
//! Interface names end up in file paths and on service command lines, so
//! anything outside the kernel naming rules is rejected up front.

use regex::Regex;

use ifcfg_network_core::error::ValidationError;

/// Kernel limit on interface names (IFNAMSIZ - 1)
pub const MAX_INTERFACE_NAME_LEN: usize = 15;

/// Syntax validator for interface names
pub struct SyntaxValidator {
    /// Valid interface name pattern
    interface_name_regex: Regex,
}

impl SyntaxValidator {
    /// Create new syntax validator
    pub fn new() -> Self {
        Self {
            interface_name_regex: Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.:-]*$")
                .expect("interface name pattern is valid"),
        }
    }

    /// Validate an interface name
    pub fn validate_interface_name(&self, name: &str) -> Result<(), ValidationError> {
        if self.interface_name_regex.is_match(name) && name.len() <= MAX_INTERFACE_NAME_LEN {
            Ok(())
        } else {
            Err(ValidationError::InterfaceName {
                name: name.to_string(),
            })
        }
    }
}

impl Default for SyntaxValidator {
    fn default() -> Self {
        Self::new()
    }
}
