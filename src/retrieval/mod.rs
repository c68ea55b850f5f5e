//! Hit retrieval and merging
//!
//! Turns a lazy, multi-language, multi-version stream of search hits into a
//! capped result set with at most one entry per item (classic listings
//! excepted), skipping items the caller is not allowed to see.

mod deduplication;
mod hit;
mod merger;
mod query;
mod visibility;

pub use deduplication::{resolve_duplicate, DuplicateDecision};
pub use hit::{Hit, ItemId, ItemRecord};
pub use merger::{merge, CancelToken, MergeStats, ResultMerger, ResultSet};
pub use query::{empty_stream, validate_query_text, HitPredicate, HitStream, QueryExecutor};
pub use visibility::{HiddenItemFilter, ItemRepository};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of search the host is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchType {
    /// Legacy listing, tolerates several entries per item
    #[default]
    Classic,
    /// Search box inside the content editor, never root-scoped
    ContentEditor,
    /// Any other search surface
    Other,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::ContentEditor => "content-editor",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "content-editor" | "contenteditor" | "content_editor" => Ok(Self::ContentEditor),
            "other" => Ok(Self::Other),
            _ => Err(format!(
                "Search type must be 'classic', 'content-editor' or 'other', got '{}'",
                s
            )),
        }
    }
}

/// Dedup settings for one merge, fixed for its whole duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePolicy {
    /// Language whose versions win over every other language
    pub preferred_language: Option<String>,

    /// Result-type mode
    pub mode: SearchType,

    /// Maximum number of retained entries
    pub cap: usize,
}

impl MergePolicy {
    pub fn new(mode: SearchType, cap: usize) -> Self {
        Self {
            preferred_language: None,
            mode,
            cap,
        }
    }

    pub fn with_preferred_language(mut self, language: impl Into<String>) -> Self {
        self.preferred_language = Some(language.into());
        self
    }

    /// Preferred language, ignoring an empty tag
    pub fn preferred_language(&self) -> Option<&str> {
        self.preferred_language
            .as_deref()
            .filter(|lang| !lang.is_empty())
    }
}

/// Query handed to a [`QueryExecutor`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitQuery {
    /// Query text
    pub text: String,

    /// Optional content language filter
    pub language: Option<String>,

    /// Optional root item limiting results to its subtree
    pub root: Option<ItemId>,

    /// Search surface issuing the query
    pub search_type: SearchType,
}

impl HitQuery {
    pub fn new(text: impl Into<String>, search_type: SearchType) -> Self {
        Self {
            text: text.into(),
            language: None,
            root: None,
            search_type,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_root(mut self, root: ItemId) -> Self {
        self.root = Some(root);
        self
    }

    /// Language filter, ignoring an empty tag
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref().filter(|lang| !lang.is_empty())
    }

    /// Root scope, which content editor searches never apply
    pub fn scope(&self) -> Option<&ItemId> {
        match self.search_type {
            SearchType::ContentEditor => None,
            _ => self.root.as_ref(),
        }
    }
}
