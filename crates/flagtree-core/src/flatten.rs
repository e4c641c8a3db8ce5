//! Recursive flattening of generic trees into dot-path entries.

use crate::error::TreeError;
use crate::value::{GenericMap, GenericValue, OptionValue, Scalar, ValueSet};

/// Flatten an object into leaf entries keyed by dot-path.
///
/// Fails on the first list holding a non-string element; nothing is
/// returned for a partially flattened tree.
pub(crate) fn flatten(root: GenericMap) -> Result<ValueSet, TreeError> {
    let mut entries = ValueSet::new();
    for (key, value) in root {
        entry(&mut entries, key, value)?;
    }
    Ok(entries)
}

fn entry(entries: &mut ValueSet, key: String, value: GenericValue) -> Result<(), TreeError> {
    match value {
        GenericValue::Object(children) => {
            for (child, value) in children {
                entry(entries, format!("{}.{}", key, child), value)?;
            }
        }
        GenericValue::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    GenericValue::Scalar(Scalar::String(s)) => values.push(s),
                    other => {
                        return Err(TreeError::Type {
                            key,
                            found: other.kind(),
                        })
                    }
                }
            }
            entries.insert(key, OptionValue::List(values));
        }
        GenericValue::Scalar(scalar) => match scalar.into_text() {
            Some(text) => {
                entries.insert(key, OptionValue::Single(text));
            }
            None => tracing::trace!(key = %key, "skipping null option"),
        },
    }
    Ok(())
}
