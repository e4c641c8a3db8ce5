//! Generic input values and the flat option values they reduce to.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Object node of a generic value tree.
pub type GenericMap = BTreeMap<String, GenericValue>;

/// Flattened options: dot-path key to a string or list of strings.
///
/// The value type is closed, so a `clone()` is a complete deep copy.
pub type ValueSet = BTreeMap<String, OptionValue>;

/// A nested, heterogeneous input value.
#[derive(Debug, Clone, PartialEq)]
pub enum GenericValue {
    Object(GenericMap),
    List(Vec<GenericValue>),
    Scalar(Scalar),
}

/// Leaf value of a generic tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    /// Number literal text. Decoded documents keep the source token
    /// (`1` stays `1`, `1E3` stays `1E3`); floats built in memory are
    /// written in plain decimal.
    Number(String),
    Bool(bool),
    /// Null leaves carry no option and are left out of the flat map.
    Null,
}

impl Scalar {
    /// Textual form stored in the flat map, `None` for null.
    pub fn into_text(self) -> Option<String> {
        match self {
            Scalar::String(s) => Some(s),
            Scalar::Number(n) => Some(n),
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Null => None,
        }
    }
}

impl GenericValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            GenericValue::Object(_) => "object",
            GenericValue::List(_) => "list",
            GenericValue::Scalar(Scalar::String(_)) => "string",
            GenericValue::Scalar(Scalar::Number(_)) => "number",
            GenericValue::Scalar(Scalar::Bool(_)) => "bool",
            GenericValue::Scalar(Scalar::Null) => "null",
        }
    }
}

impl From<Value> for GenericValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => GenericValue::Scalar(Scalar::Null),
            Value::Bool(b) => GenericValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => GenericValue::from(n),
            Value::String(s) => GenericValue::Scalar(Scalar::String(s)),
            Value::Array(items) => {
                GenericValue::List(items.into_iter().map(GenericValue::from).collect())
            }
            Value::Object(map) => GenericValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, GenericValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<GenericMap> for GenericValue {
    fn from(map: GenericMap) -> Self {
        GenericValue::Object(map)
    }
}

impl From<&str> for GenericValue {
    fn from(s: &str) -> Self {
        GenericValue::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for GenericValue {
    fn from(s: String) -> Self {
        GenericValue::Scalar(Scalar::String(s))
    }
}

impl From<bool> for GenericValue {
    fn from(b: bool) -> Self {
        GenericValue::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for GenericValue {
    fn from(n: i64) -> Self {
        GenericValue::Scalar(Scalar::Number(n.to_string()))
    }
}

impl From<u64> for GenericValue {
    fn from(n: u64) -> Self {
        GenericValue::Scalar(Scalar::Number(n.to_string()))
    }
}

impl From<f64> for GenericValue {
    /// Non-finite floats have no JSON form and become null.
    fn from(n: f64) -> Self {
        match float_text(n) {
            Some(text) => GenericValue::Scalar(Scalar::Number(text)),
            None => GenericValue::Scalar(Scalar::Null),
        }
    }
}

impl From<Number> for GenericValue {
    fn from(n: Number) -> Self {
        match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => GenericValue::from(i),
            (None, Some(u), _) => GenericValue::from(u),
            (None, None, Some(f)) => GenericValue::from(f),
            (None, None, None) => GenericValue::Scalar(Scalar::Number(n.to_string())),
        }
    }
}

/// Plain decimal text for a finite float, never an exponent.
///
/// Integral values keep a `.0` so they still read as floats.
fn float_text(n: f64) -> Option<String> {
    if !n.is_finite() {
        return None;
    }
    let mut text = n.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    Some(text)
}

impl<T: Into<GenericValue>> From<Vec<T>> for GenericValue {
    fn from(items: Vec<T>) -> Self {
        GenericValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// A flattened option: one string, or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Single(String),
    List(Vec<String>),
}

impl OptionValue {
    /// All values in order; a single value is a one-element slice.
    pub fn values(&self) -> &[String] {
        match self {
            OptionValue::Single(s) => std::slice::from_ref(s),
            OptionValue::List(items) => items,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Single(s) => Some(s),
            OptionValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::Single(_) => None,
            OptionValue::List(items) => Some(items),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Single(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Single(s)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(items: Vec<String>) -> Self {
        OptionValue::List(items)
    }
}

impl From<OptionValue> for GenericValue {
    fn from(value: OptionValue) -> Self {
        match value {
            OptionValue::Single(s) => GenericValue::Scalar(Scalar::String(s)),
            OptionValue::List(items) => GenericValue::List(
                items
                    .into_iter()
                    .map(|s| GenericValue::Scalar(Scalar::String(s)))
                    .collect(),
            ),
        }
    }
}
