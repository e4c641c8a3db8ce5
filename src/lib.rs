//! flagtree - nested option documents as flat dot-path keys
//!
//! This crate wraps the [`flagtree_core`] option tree with the pieces a
//! caller needs around it: loading JSON/TOML documents, layering them, and
//! reporting the effective options with provenance.

pub mod config;

pub use config::{Document, DocumentFormat, EffectiveOptions, EffectiveReport};
pub use flagtree_core::{ConfigTree, GenericMap, GenericValue, OptionValue, Scalar, TreeError, ValueSet};
