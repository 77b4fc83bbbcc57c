//! Document loading.
//!
//! This module loads JSON or YAML documents from files or stdin into a
//! [`Value`] tree that path expressions can operate on.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tracing::debug;

use super::{is_gzipped_path, DocumentFormat};
use crate::document::node::Value;

/// Parses `content` in the given format.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).context("Failed to parse JSON"),
        DocumentFormat::Yaml => serde_yaml::from_str(content).context("Failed to parse YAML"),
    }
}

/// Loads and parses a document from the filesystem.
///
/// The format comes from the file extension (see
/// [`DocumentFormat::from_path`]); `.gz` files are decompressed first.
///
/// # Examples
///
/// ```no_run
/// use jsonxs::file::loader::load_document;
///
/// let (doc, format) = load_document("feed.json").unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be read
/// - A `.gz` file is not valid gzip
/// - The contents are not valid JSON or YAML
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<(Value, DocumentFormat)> {
    let path_ref = path.as_ref();

    let content = if is_gzipped_path(path_ref) {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read file {}", path_ref.display()))?
    };

    let format = DocumentFormat::from_path(path_ref);
    debug!(path = %path_ref.display(), %format, "loading document");
    let value = parse_document(&content, format)?;
    Ok((value, format))
}

/// Loads a document from standard input.
///
/// Gzip input is detected by its magic bytes. JSON is tried first, then
/// YAML.
///
/// ```no_run
/// use jsonxs::file::loader::load_document_from_stdin;
///
/// // Usage: echo '{"feed": {"id": 1}}' | jsonxs feed.id
/// let (doc, format) = load_document_from_stdin().unwrap();
/// ```
pub fn load_document_from_stdin() -> Result<(Value, DocumentFormat)> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;
    parse_bytes(&buffer)
}

/// Parses raw bytes of unknown format.
pub fn parse_bytes(bytes: &[u8]) -> Result<(Value, DocumentFormat)> {
    // gzip magic bytes
    let content = if bytes.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(bytes)?
    } else {
        String::from_utf8(bytes.to_vec()).context("Invalid UTF-8 in input")?
    };

    if let Ok(value) = parse_document(&content, DocumentFormat::Json) {
        return Ok((value, DocumentFormat::Json));
    }

    let value = parse_document(&content, DocumentFormat::Yaml)
        .context("Input is neither valid JSON nor valid YAML")?;
    Ok((value, DocumentFormat::Yaml))
}

/// Reads and decompresses a gzipped file.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}
