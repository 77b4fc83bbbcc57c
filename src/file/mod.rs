//! File I/O for JSON and YAML documents.
//!
//! This module loads documents from disk or stdin, and writes them back with
//! atomic write operations and optional backups. Gzip-compressed files are
//! handled transparently.

pub mod loader;
pub mod saver;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from a file name, ignoring a trailing `.gz`.
    ///
    /// Examples:
    /// - `data.yaml` → Yaml
    /// - `data.yml.gz` → Yaml
    /// - `data.json.gz` → Json
    /// - `data` → Json
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path_str = path.as_ref().to_string_lossy().to_ascii_lowercase();
        let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

        if base.ends_with(".yaml") || base.ends_with(".yml") {
            DocumentFormat::Yaml
        } else {
            DocumentFormat::Json
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            DocumentFormat::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            other => Err(format!("unknown format '{}', expected json or yaml", other)),
        }
    }
}

/// Returns true if the path names a gzip-compressed file.
pub(crate) fn is_gzipped_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false)
}
