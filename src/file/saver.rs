//! Document saving.
//!
//! This module renders [`Value`] trees as JSON or YAML and writes them to
//! files with atomic write operations and optional backup creation.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use tracing::debug;

use super::{is_gzipped_path, DocumentFormat};
use crate::config::Config;
use crate::document::node::Value;

/// Renders `value` in `format`.
///
/// JSON honours `config.compact` and `config.indent_size` and always ends
/// with a newline. YAML ignores both.
///
/// # Example
///
/// ```
/// use jsonxs::config::Config;
/// use jsonxs::file::saver::render_document;
/// use jsonxs::file::DocumentFormat;
/// use jsonxs::Value;
///
/// let doc = Value::Sequence(vec![Value::from("a")]);
/// let config = Config { compact: true, ..Config::default() };
/// assert_eq!(render_document(&doc, DocumentFormat::Json, &config).unwrap(), "[\"a\"]\n");
/// ```
pub fn render_document(value: &Value, format: DocumentFormat, config: &Config) -> Result<String> {
    match format {
        DocumentFormat::Json => {
            let mut output = if config.compact {
                serde_json::to_string(value).context("Failed to serialize JSON")?
            } else {
                let indent = " ".repeat(config.indent_size);
                let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
                let mut buffer = Vec::new();
                let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
                value
                    .serialize(&mut serializer)
                    .context("Failed to serialize JSON")?;
                String::from_utf8(buffer).context("Serialized JSON is not UTF-8")?
            };
            output.push('\n');
            Ok(output)
        }
        DocumentFormat::Yaml => serde_yaml::to_string(value).context("Failed to serialize YAML"),
    }
}

/// Saves a document to a file with optional backup creation.
///
/// The write is atomic: the document goes to a temporary file that is then
/// renamed over the target, so the target is never left half written. Paths
/// ending in `.gz` are gzip-compressed.
///
/// # Examples
///
/// ```no_run
/// use jsonxs::config::Config;
/// use jsonxs::file::saver::save_document;
/// use jsonxs::file::DocumentFormat;
/// use jsonxs::Value;
///
/// save_document("output.json", &Value::mapping(), DocumentFormat::Json, &Config::default()).unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - Backup creation fails (if requested)
/// - Writing to the temp file fails
/// - Renaming the temp file to the target fails
pub fn save_document<P: AsRef<Path>>(
    path: P,
    value: &Value,
    format: DocumentFormat,
    config: &Config,
) -> Result<()> {
    let path = path.as_ref();

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let output = render_document(value, format, config)?;
    debug!(path = %path.display(), %format, bytes = output.len(), "saving document");
    write_file_atomic(path, output.as_bytes(), is_gzipped_path(path))
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Writes data to a file atomically, optionally compressing with gzip.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    let path = path.as_ref();
    let mut temp_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?
        .to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn sample() -> Value {
        serde_json::from_str(r#"{"feed": {"tags": ["devel"]}}"#).unwrap()
    }

    #[test]
    fn test_render_pretty_json_uses_indent_size() {
        let config = Config {
            indent_size: 4,
            ..Config::default()
        };
        let output = render_document(&sample(), DocumentFormat::Json, &config).unwrap();
        assert!(output.contains("\n    \"feed\": {"));
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_render_yaml() {
        let output = render_document(&sample(), DocumentFormat::Yaml, &Config::default()).unwrap();
        assert_eq!(output, "feed:\n  tags:\n  - devel\n");
    }

    #[test]
    fn test_write_file_atomic_uncompressed() {
        let dir = TempDir::new().unwrap();
        let target_path = dir.path().join("out.json");
        write_file_atomic(&target_path, b"{}", false).unwrap();

        assert_eq!(fs::read_to_string(&target_path).unwrap(), "{}");
        assert!(!dir.path().join("out.json.tmp").exists());
    }

    #[test]
    fn test_write_file_atomic_keeps_sibling_tmp_file() {
        let dir = TempDir::new().unwrap();
        let sibling = dir.path().join("out.tmp");
        fs::write(&sibling, "keep me").unwrap();

        write_file_atomic(dir.path().join("out.json"), b"{}", false).unwrap();

        assert_eq!(fs::read_to_string(&sibling).unwrap(), "keep me");
    }

    #[test]
    fn test_write_file_atomic_compressed() {
        let dir = TempDir::new().unwrap();
        let target_path = dir.path().join("out.json.gz");
        write_file_atomic(&target_path, b"[1]", true).unwrap();

        let mut decoder = GzDecoder::new(fs::File::open(&target_path).unwrap());
        let mut content = String::new();
        decoder.read_to_string(&mut content).unwrap();
        assert_eq!(content, "[1]");
    }

    #[test]
    fn test_save_creates_backup() {
        let dir = TempDir::new().unwrap();
        let target_path = dir.path().join("feed.json");
        fs::write(&target_path, "{\"old\": true}").unwrap();

        let config = Config {
            create_backup: true,
            ..Config::default()
        };
        save_document(&target_path, &sample(), DocumentFormat::Json, &config).unwrap();

        let backup = fs::read_to_string(dir.path().join("feed.json.bak")).unwrap();
        assert_eq!(backup, "{\"old\": true}");
        assert!(fs::read_to_string(&target_path).unwrap().contains("devel"));
    }
}
