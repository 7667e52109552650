//! ifcfg file parser and generator
//!
//! An ifcfg file is a flat list of `KEY=value` lines. Comment lines start with
//! `#` after optional leading whitespace. Key order is preserved across a
//! parse/generate cycle so rewritten files diff cleanly against the original.

use log::debug;

use ifcfg_network_core::{COMMENT_PREFIX, KEY_NM_CONTROLLED};

use crate::interface_config::InterfaceConfig;

/// Parser for ifcfg-style key=value files
pub struct IfcfgParser {
    separator: char,
}

/// Represents a line in an ifcfg file
#[derive(Debug, Clone, PartialEq)]
enum IfcfgLine {
    Comment,
    Entry { key: String, value: String },
    Skipped,
}

impl IfcfgParser {
    /// Create new parser
    pub fn new() -> Self {
        Self { separator: '=' }
    }

    /// Parse ifcfg file content.
    ///
    /// Blank lines, lines without a separator and lines with an empty key are
    /// skipped. A repeated key keeps its first position and takes the last
    /// value. `NM_CONTROLLED` is always forced to `no` so NetworkManager keeps
    /// its hands off the interface.
    pub fn parse(&self, content: &str) -> InterfaceConfig {
        let mut config = InterfaceConfig::new();

        for (index, line) in content.lines().enumerate() {
            match self.parse_line(line) {
                IfcfgLine::Entry { key, value } => config.set(key, value),
                IfcfgLine::Comment => {}
                IfcfgLine::Skipped => {
                    if !line.trim().is_empty() {
                        debug!("Skipping malformed ifcfg line {}: {:?}", index + 1, line);
                    }
                }
            }
        }

        config.set(KEY_NM_CONTROLLED, "no");
        config
    }

    /// Generate ifcfg file content.
    ///
    /// Entries with a blank value are left out. Lines are joined with `\n`
    /// and there is no trailing newline.
    pub fn generate(&self, config: &InterfaceConfig) -> String {
        config
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{}{}{}", key, self.separator, value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse a single line
    fn parse_line(&self, line: &str) -> IfcfgLine {
        if line.trim_start().starts_with(COMMENT_PREFIX) {
            return IfcfgLine::Comment;
        }

        // Only the first two segments count; anything after a second `=` is dropped
        let mut parts = line.split(self.separator);
        let key = parts.next().unwrap_or("").trim();
        let value = match parts.next() {
            Some(value) => value.trim(),
            None => return IfcfgLine::Skipped,
        };

        if key.is_empty() {
            return IfcfgLine::Skipped;
        }

        IfcfgLine::Entry {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl Default for IfcfgParser {
    fn default() -> Self {
        Self::new()
    }
}
