//! Effective options with full provenance
//!
//! The effective options capture the merged option tree plus information
//! about where each layer came from.

use flagtree_core::{ConfigTree, OptionValue, TreeError, ValueSet};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use super::merge::merge_layers;
use super::source::{Document, DocumentSource, SourceError};

/// Schema identifier for the effective options report
pub const SCHEMA_ID: &str = "flagtree/effective_options@1";

/// Leaf keys that hold secrets and are redacted in reports
const SECRET_KEYS: &[&str] = &[
    "password",
    "token",
    "secret",
    "private_key",
    "api_key",
    "credential",
];

const REDACTED: &str = "[REDACTED]";

/// Merged option tree together with the sources that produced it
#[derive(Debug, Clone)]
pub struct EffectiveOptions {
    /// Component prefix the tree was filtered to, if any
    pub prefix: Option<String>,

    /// Contributing sources in precedence order
    pub sources: Vec<DocumentSource>,

    pub tree: ConfigTree,
}

impl EffectiveOptions {
    /// Merge documents in order and optionally narrow to one component.
    pub fn build(documents: Vec<Document>, prefix: Option<&str>) -> Result<Self, ComposeError> {
        let (sources, trees): (Vec<_>, Vec<_>) = documents
            .into_iter()
            .map(|doc| (doc.source, doc.tree))
            .unzip();

        let merged = merge_layers(trees)?;
        let tree = match prefix {
            Some(p) => merged.filter(p),
            None => merged,
        };

        tracing::debug!(
            layers = sources.len(),
            options = tree.len(),
            prefix = prefix.unwrap_or(""),
            "built effective options"
        );

        Ok(Self {
            prefix: prefix.map(str::to_string),
            sources,
            tree,
        })
    }

    /// Load documents from disk, then [`build`](Self::build).
    pub fn load(paths: &[PathBuf], prefix: Option<&str>) -> Result<Self, ComposeError> {
        let documents = paths
            .iter()
            .map(|path| Document::load(path))
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(documents, prefix)
    }

    /// SHA-256 of the JCS (RFC 8785) form of the flat options.
    ///
    /// Independent of source formatting and layer boundaries.
    pub fn fingerprint(&self) -> Result<String, ComposeError> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(self.tree.as_map())
            .map_err(|e| ComposeError::JcsError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Report with secret-looking values redacted.
    pub fn report(&self) -> Result<EffectiveReport, ComposeError> {
        let (options, redactions) = redact_secrets(self.tree.as_map());
        Ok(EffectiveReport {
            schema_id: SCHEMA_ID.to_string(),
            prefix: self.prefix.clone(),
            sources: self.sources.clone(),
            fingerprint: self.fingerprint()?,
            options,
            redactions,
        })
    }
}

fn is_secret(key: &str) -> bool {
    let leaf = key.rsplit('.').next().unwrap_or(key).to_lowercase();
    SECRET_KEYS.iter().any(|s| leaf.contains(s))
}

/// Copy of `options` with secret values replaced, plus the redacted keys
fn redact_secrets(options: &ValueSet) -> (ValueSet, Vec<String>) {
    let mut redactions = Vec::new();
    let redacted = options
        .iter()
        .map(|(key, value)| {
            if is_secret(key) {
                redactions.push(key.clone());
                (key.clone(), OptionValue::from(REDACTED))
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect();
    (redacted, redactions)
}

/// Serializable view of [`EffectiveOptions`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveReport {
    pub schema_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    pub sources: Vec<DocumentSource>,

    pub fingerprint: String,

    /// Flat options, secrets redacted
    pub options: ValueSet,

    /// Redacted key paths
    pub redactions: Vec<String>,
}

impl EffectiveReport {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        match &self.prefix {
            Some(p) => out.push_str(&format!("Effective options for '{}'\n", p)),
            None => out.push_str("Effective options\n"),
        }
        out.push_str(&format!("  Fingerprint: {}\n", self.fingerprint));

        out.push_str(&format!("\nSources ({}):\n", self.sources.len()));
        for source in &self.sources {
            out.push_str(&format!(
                "  {} ({:?}, sha256 {})\n",
                source.origin, source.format, source.digest
            ));
        }

        out.push_str(&format!("\nOptions ({}):\n", self.options.len()));
        for (key, value) in &self.options {
            match value {
                OptionValue::Single(v) => out.push_str(&format!("  {} = {}\n", key, v)),
                OptionValue::List(items) => {
                    out.push_str(&format!("  {} = [{}]\n", key, items.join(", ")))
                }
            }
        }

        if !self.redactions.is_empty() {
            out.push_str(&format!("\nRedacted: {}\n", self.redactions.join(", ")));
        }
        out
    }
}

/// Composition errors
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("JCS error: {0}")]
    JcsError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentFormat;
    use std::io::Write;
    use tempfile::Builder;

    fn json_doc(origin: &str, body: &str) -> Document {
        Document::from_bytes(origin, DocumentFormat::Json, body.as_bytes()).unwrap()
    }

    #[test]
    fn test_build_single_document_echoes() {
        let body = r#"{"memory": {"max-traces": 100000}}"#;
        let effective = EffectiveOptions::build(vec![json_doc("a.json", body)], None).unwrap();

        assert_eq!(effective.sources.len(), 1);
        assert_eq!(effective.tree.encode().unwrap(), body.as_bytes().to_vec());
    }

    #[test]
    fn test_build_layers_in_order() {
        let effective = EffectiveOptions::build(
            vec![
                json_doc("defaults.json", r#"{"log-level": "info", "es": {"num-shards": 5}}"#),
                json_doc("override.json", r#"{"log-level": "debug"}"#),
            ],
            None,
        )
        .unwrap();

        assert_eq!(effective.sources[0].origin, "defaults.json");
        assert_eq!(effective.sources[1].origin, "override.json");
        assert_eq!(
            effective.tree.to_args(),
            vec!["--es.num-shards=5", "--log-level=debug"]
        );
    }

    #[test]
    fn test_build_with_prefix() {
        let effective = EffectiveOptions::build(
            vec![json_doc(
                "a.json",
                r#"{"es": {"server-urls": "http://es:9200"}, "es-archive": {"enabled": true}, "log-level": "info"}"#,
            )],
            Some("es"),
        )
        .unwrap();

        assert_eq!(effective.prefix.as_deref(), Some("es"));
        assert_eq!(
            effective.tree.to_args(),
            vec!["--es-archive.enabled=true", "--es.server-urls=http://es:9200"]
        );
        assert!(effective.tree.cached_encoding().is_none());
    }

    #[test]
    fn test_fingerprint_ignores_formatting() {
        let a = EffectiveOptions::build(vec![json_doc("a", r#"{"a":{"b":"1"},"c":"2"}"#)], None)
            .unwrap();
        let b = EffectiveOptions::build(
            vec![json_doc("b", r#"{ "c": "2", "a.b": "1" }"#)],
            None,
        )
        .unwrap();

        let fp = a.fingerprint().unwrap();
        assert_eq!(fp.len(), 64);
        assert_eq!(fp, b.fingerprint().unwrap());
    }

    #[test]
    fn test_fingerprint_tracks_values() {
        let a = EffectiveOptions::build(vec![json_doc("a", r#"{"c":"2"}"#)], None).unwrap();
        let b = EffectiveOptions::build(vec![json_doc("b", r#"{"c":"3"}"#)], None).unwrap();
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_report_redacts_secrets() {
        let effective = EffectiveOptions::build(
            vec![json_doc(
                "a.json",
                r#"{"es": {"password": "hunter2", "username": "elastic", "api_key": "k"}}"#,
            )],
            None,
        )
        .unwrap();

        let report = effective.report().unwrap();

        assert_eq!(report.schema_id, SCHEMA_ID);
        assert_eq!(report.options["es.password"], OptionValue::from(REDACTED));
        assert_eq!(report.options["es.api_key"], OptionValue::from(REDACTED));
        assert_eq!(report.options["es.username"], OptionValue::from("elastic"));
        assert_eq!(report.redactions, vec!["es.api_key", "es.password"]);

        // the tree itself is untouched
        assert!(effective
            .tree
            .to_args()
            .contains(&"--es.password=hunter2".to_string()));
    }

    #[test]
    fn test_secret_match_uses_leaf_segment() {
        assert!(is_secret("cassandra.password"));
        assert!(is_secret("es.tls.Token"));
        assert!(!is_secret("password-store.path"));
    }

    #[test]
    fn test_report_human() {
        let effective = EffectiveOptions::build(
            vec![json_doc("a.json", r#"{"tags": ["x", "y"], "kafka": {"secret": "s"}}"#)],
            Some("kafka"),
        )
        .unwrap();
        let human = effective.report().unwrap().to_human();

        assert!(human.contains("Effective options for 'kafka'"));
        assert!(human.contains("kafka.secret = [REDACTED]"));
        assert!(!human.contains("tags"));
    }

    #[test]
    fn test_report_json() {
        let effective =
            EffectiveOptions::build(vec![json_doc("a.json", r#"{"tags": ["x"]}"#)], None).unwrap();
        let json = effective.report().unwrap().to_json().unwrap();

        assert!(json.contains("\"schema_id\": \"flagtree/effective_options@1\""));
        assert!(json.contains("\"format\": \"json\""));
        assert!(!json.contains("\"prefix\""));
    }

    #[test]
    fn test_load_mixed_formats() {
        let mut base = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(base, "[query]").unwrap();
        writeln!(base, "base-path = \"/\"").unwrap();
        writeln!(base, "port = 16686").unwrap();

        let mut overlay = Builder::new().suffix(".json").tempfile().unwrap();
        write!(overlay, r#"{{"query": {{"base-path": "/jaeger"}}}}"#).unwrap();

        let effective = EffectiveOptions::load(
            &[base.path().to_path_buf(), overlay.path().to_path_buf()],
            Some("query"),
        )
        .unwrap();

        assert_eq!(
            effective.tree.to_args(),
            vec!["--query.base-path=/jaeger", "--query.port=16686"]
        );
        assert_eq!(effective.sources[0].format, DocumentFormat::Toml);
    }

    #[test]
    fn test_load_propagates_source_error() {
        let err = EffectiveOptions::load(&[PathBuf::from("opts.ini")], None).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::Source(SourceError::UnsupportedFormat(_))
        ));
    }
}
