//! Error types for option trees.

/// Errors raised while building or encoding a [`ConfigTree`](crate::ConfigTree).
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Input bytes are not a well-formed JSON object.
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The root handed to construction is not an object.
    #[error("Option tree root must be an object, found {0}")]
    NotAnObject(&'static str),

    /// A list value holds something other than strings.
    #[error("Option '{key}' must be a list of strings, found {found} element")]
    Type {
        /// Dot-path of the offending list
        key: String,
        /// Kind of the first non-string element
        found: &'static str,
    },

    /// Serializing the flat map failed.
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),
}
