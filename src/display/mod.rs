//! Display formatting of merged results
//!
//! Turns retained hits into title/icon/URL triples. Entries without a
//! backing item, a title or an icon are filtered out.

mod formatter;

pub use formatter::DisplayFormatter;

use serde::{Deserialize, Serialize};

/// Source of installation-wide display settings
pub trait SettingsProvider {
    /// Icon used when neither the hit nor its item carries one
    fn default_icon(&self) -> Option<String>;
}

/// Settings provider with nothing configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSettings;

impl SettingsProvider for NoSettings {
    fn default_icon(&self) -> Option<String> {
        None
    }
}

/// One display-ready search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub icon: String,
    /// Empty when the hit has no URI
    pub url: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, icon: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            url: url.into(),
        }
    }
}

/// Output sink the host reads results from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResults {
    results: Vec<SearchResult>,
}

impl SearchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: SearchResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.iter()
    }
}

impl Extend<SearchResult> for SearchResults {
    fn extend<T: IntoIterator<Item = SearchResult>>(&mut self, iter: T) {
        self.results.extend(iter);
    }
}
