//! Flat option trees.
//!
//! A [`ConfigTree`] ingests nested option documents and exposes them as a flat
//! map of dot-separated leaf paths. From there it can be filtered by component
//! prefix, exported for composition with other trees, rendered as
//! `--key=value` arguments, and encoded back to JSON. A tree decoded from JSON
//! re-encodes to exactly the bytes it was decoded from.

mod error;
mod flatten;
mod raw;
mod tree;
mod value;

pub use error::TreeError;
pub use tree::{ConfigTree, ARCHIVE_SUFFIX, EMPTY_OBJECT};
pub use value::{GenericMap, GenericValue, OptionValue, Scalar, ValueSet};
