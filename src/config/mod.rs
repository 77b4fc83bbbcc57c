//! Configuration system for jsonxs.
//!
//! Settings are read from `~/.config/jsonxs/config.toml`. Every field has a
//! default, so the file may set only what it needs to change, and command-line
//! flags override whatever the file says.
//!
//! # Example
//!
//! ```
//! use jsonxs::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.indent_size, 2);
//! assert!(!config.compact);
//!
//! let custom = Config {
//!     indent_size: 4,
//!     ..Config::default()
//! };
//! assert_eq!(custom.indent_size, 4);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::file::DocumentFormat;

/// Configuration for the jsonxs command.
///
/// # Fields
///
/// * `indent_size` - Spaces per indentation level in pretty JSON (default: 2)
/// * `output_format` - Force `json` or `yaml` output; unset follows the input
/// * `compact` - Write JSON on a single line (default: false)
/// * `create_backup` - Create .bak files before in-place writes (default: false)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of spaces per indentation level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Output format; follows the input document when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<DocumentFormat>,

    /// Write JSON without newlines or indentation
    #[serde(default)]
    pub compact: bool,

    /// Create .bak files before writing in place
    #[serde(default)]
    pub create_backup: bool,
}

/// Returns the default indentation size.
fn default_indent_size() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            output_format: None,
            compact: false,
            create_backup: false,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/jsonxs/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("jsonxs");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "ignoring invalid config file");
                Self::default()
            }),
            Err(err) => {
                warn!(path = %path.display(), %err, "could not read config file");
                Self::default()
            }
        }
    }

    /// Saves configuration to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
