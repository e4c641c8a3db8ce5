//! JSON decoding that keeps number tokens as written.

use serde_json::value::RawValue;
use std::collections::BTreeMap;

use crate::value::{GenericMap, GenericValue, Scalar};

/// Decode a JSON object into a generic tree.
///
/// Each member is held as raw text and classified by its first byte, so a
/// number leaf carries its exact source token (`1E3`, `1.50`, big integers).
pub(crate) fn decode_object(bytes: &[u8]) -> Result<GenericMap, serde_json::Error> {
    let members: BTreeMap<String, Box<RawValue>> = serde_json::from_slice(bytes)?;
    members_to_generic(members)
}

fn members_to_generic(
    members: BTreeMap<String, Box<RawValue>>,
) -> Result<GenericMap, serde_json::Error> {
    members
        .into_iter()
        .map(|(key, raw)| Ok((key, raw_to_generic(&raw)?)))
        .collect()
}

fn raw_to_generic(raw: &RawValue) -> Result<GenericValue, serde_json::Error> {
    let text = raw.get().trim();
    let value = match text.as_bytes().first() {
        Some(b'{') => GenericValue::Object(members_to_generic(serde_json::from_str(text)?)?),
        Some(b'[') => {
            let items: Vec<Box<RawValue>> = serde_json::from_str(text)?;
            GenericValue::List(
                items
                    .iter()
                    .map(|item| raw_to_generic(item))
                    .collect::<Result<_, _>>()?,
            )
        }
        Some(b'"') => GenericValue::Scalar(Scalar::String(serde_json::from_str(text)?)),
        Some(b't') | Some(b'f') => GenericValue::Scalar(Scalar::Bool(serde_json::from_str(text)?)),
        Some(b'n') => GenericValue::Scalar(Scalar::Null),
        _ => GenericValue::Scalar(Scalar::Number(text.to_string())),
    };
    Ok(value)
}
