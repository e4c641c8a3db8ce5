//! Option documents read from disk
//!
//! JSON documents take the decode path, so the tree echoes the file bytes
//! when encoded. TOML documents are converted into a generic tree first and
//! encode as the flat map.

use flagtree_core::{ConfigTree, GenericMap, GenericValue, TreeError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Encoding of an option document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(SourceError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Provenance of a loaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSource {
    /// File path, or a caller-chosen label for in-memory documents
    pub origin: String,

    pub format: DocumentFormat,

    /// SHA-256 digest of the raw bytes
    pub digest: String,
}

/// A loaded option document
#[derive(Debug, Clone)]
pub struct Document {
    pub source: DocumentSource,
    pub tree: ConfigTree,
}

impl Document {
    /// Read and parse a document, detecting the format from its extension
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let format = DocumentFormat::from_path(path)?;
        let bytes = fs::read(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(path.to_string_lossy().to_string(), format, &bytes)
    }

    /// Parse a document held in memory
    pub fn from_bytes(
        origin: impl Into<String>,
        format: DocumentFormat,
        bytes: &[u8],
    ) -> Result<Self, SourceError> {
        let origin = origin.into();

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hex::encode(hasher.finalize());

        let tree = match format {
            DocumentFormat::Json => ConfigTree::decode(bytes)?,
            DocumentFormat::Toml => {
                let contents = std::str::from_utf8(bytes)
                    .map_err(|e| SourceError::ParseError(format!("Invalid UTF-8: {}", e)))?;
                let table: toml::Table = toml::from_str(contents)
                    .map_err(|e| SourceError::ParseError(format!("TOML parse error: {}", e)))?;
                ConfigTree::from_map(table_to_generic(table))?
            }
        };

        tracing::debug!(
            origin = %origin,
            format = ?format,
            options = tree.len(),
            "loaded option document"
        );

        Ok(Self {
            source: DocumentSource {
                origin,
                format,
                digest,
            },
            tree,
        })
    }
}

fn table_to_generic(table: toml::Table) -> GenericMap {
    table
        .into_iter()
        .map(|(k, v)| (k, toml_to_generic(v)))
        .collect()
}

fn toml_to_generic(value: toml::Value) -> GenericValue {
    match value {
        toml::Value::String(s) => GenericValue::from(s),
        toml::Value::Integer(i) => GenericValue::from(i),
        toml::Value::Float(f) => GenericValue::from(f),
        toml::Value::Boolean(b) => GenericValue::from(b),
        toml::Value::Datetime(dt) => GenericValue::from(dt.to_string()),
        toml::Value::Array(arr) => {
            GenericValue::List(arr.into_iter().map(toml_to_generic).collect())
        }
        toml::Value::Table(table) => GenericValue::Object(table_to_generic(table)),
    }
}

/// Document loading errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Unsupported document format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error(transparent)]
    Tree(#[from] TreeError),
}
