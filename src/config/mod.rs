//! Option documents and their composition
//!
//! Loads option documents from disk, layers several of them into one tree
//! (later documents win per key), and reports the effective result with
//! provenance:
//! 1. Document sources (`.json` keeps the exact bytes, `.toml` is converted)
//! 2. Layer merge
//! 3. Optional component prefix filter

mod effective;
mod merge;
mod source;

pub use effective::{ComposeError, EffectiveOptions, EffectiveReport, SCHEMA_ID};
pub use merge::{merge_layers, merge_trees};
pub use source::{Document, DocumentFormat, DocumentSource, SourceError};
