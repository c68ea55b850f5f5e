//! hitmerge - search hit merging for content-managed search pipelines
//!
//! Consumes the lazy, multi-language, multi-version hit stream of a content
//! search, keeps one entry per item according to language and version
//! preferences, withholds hidden items, caps the result count and formats
//! what is left for display.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod retrieval;

pub use error::{HitmergeError, LookupError, MergeError, QueryError, Result};
