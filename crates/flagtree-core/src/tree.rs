//! The option tree and its operations.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

use crate::error::TreeError;
use crate::flatten::flatten;
use crate::raw::decode_object;
use crate::value::{GenericMap, GenericValue, OptionValue, ValueSet};

/// Suffix of the sibling namespace kept alongside a component prefix.
pub const ARCHIVE_SUFFIX: &str = "-archive";

/// Encoding of a tree with no options.
pub const EMPTY_OBJECT: &[u8] = b"{}";

/// Flattened options with an optional exact copy of the JSON they came from.
///
/// Encoding a decoded tree echoes the original bytes. Encoding a tree built
/// from a generic map, or produced by [`filter`](Self::filter), writes the
/// flat map: every dot-path becomes a top-level key and nothing is re-nested.
#[derive(Debug, Clone, Default)]
pub struct ConfigTree {
    canonical: ValueSet,
    cached_encoding: Option<Vec<u8>>,
}

impl ConfigTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from an in-memory object.
    pub fn from_map(root: GenericMap) -> Result<Self, TreeError> {
        let canonical = flatten(root)?;
        tracing::debug!(options = canonical.len(), "built option tree");
        Ok(Self {
            canonical,
            cached_encoding: None,
        })
    }

    /// Build a tree from a generic value, which must be an object.
    pub fn from_tree(root: GenericValue) -> Result<Self, TreeError> {
        match root {
            GenericValue::Object(map) => Self::from_map(map),
            other => Err(TreeError::NotAnObject(other.kind())),
        }
    }

    /// Decode a JSON object, keeping `bytes` for exact re-encoding.
    ///
    /// Number leaves keep their literal token.
    pub fn decode(bytes: &[u8]) -> Result<Self, TreeError> {
        let root = decode_object(bytes).map_err(TreeError::Decode)?;
        let canonical = flatten(root)?;
        tracing::debug!(
            options = canonical.len(),
            bytes = bytes.len(),
            "decoded option tree"
        );
        Ok(Self {
            canonical,
            cached_encoding: Some(bytes.to_vec()),
        })
    }

    /// Options under `prefix.` or `prefix-archive.`.
    ///
    /// The result never carries a cached encoding.
    pub fn filter(&self, prefix: &str) -> Self {
        let direct = format!("{}.", prefix);
        let archive = format!("{}{}.", prefix, ARCHIVE_SUFFIX);

        let canonical: ValueSet = self
            .canonical
            .iter()
            .filter(|(key, _)| key.starts_with(&direct) || key.starts_with(&archive))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        tracing::debug!(
            prefix,
            kept = canonical.len(),
            total = self.canonical.len(),
            "filtered option tree"
        );
        Self {
            canonical,
            cached_encoding: None,
        }
    }

    /// Render as `--key=value` arguments, sorted by key.
    ///
    /// List options produce one argument per element, in list order.
    pub fn to_args(&self) -> Vec<String> {
        self.canonical
            .iter()
            .flat_map(|(key, value)| {
                value
                    .values()
                    .iter()
                    .map(move |v| format!("--{}={}", key, v))
            })
            .collect()
    }

    /// Encode as JSON.
    pub fn encode(&self) -> Result<Vec<u8>, TreeError> {
        if let Some(bytes) = &self.cached_encoding {
            return Ok(bytes.clone());
        }
        if self.canonical.is_empty() {
            return Ok(EMPTY_OBJECT.to_vec());
        }
        serde_json::to_vec(&self.canonical).map_err(TreeError::Encode)
    }

    /// The flat options.
    pub fn as_map(&self) -> &ValueSet {
        &self.canonical
    }

    /// An owned copy of the flat options.
    pub fn to_value_set(&self) -> ValueSet {
        self.canonical.clone()
    }

    /// An independent copy suitable for [`from_map`](Self::from_map).
    ///
    /// Keys are already leaf paths, so rebuilding from the copy yields the same
    /// flat map.
    pub fn to_generic_map(&self) -> GenericMap {
        self.canonical
            .iter()
            .map(|(key, value)| (key.clone(), GenericValue::from(value.clone())))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.canonical.get(key)
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// The bytes this tree was decoded from, if any.
    pub fn cached_encoding(&self) -> Option<&[u8]> {
        self.cached_encoding.as_deref()
    }
}

impl Serialize for ConfigTree {
    /// Emits the cached JSON text when present, otherwise the flat map.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.cached_encoding {
            Some(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(S::Error::custom)?;
                let raw = RawValue::from_string(text.to_string()).map_err(S::Error::custom)?;
                raw.serialize(serializer)
            }
            None => self.canonical.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        ConfigTree::decode(raw.get().as_bytes()).map_err(D::Error::custom)
    }
}
