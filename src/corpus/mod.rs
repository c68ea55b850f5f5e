//! File-backed hit corpus
//!
//! A JSON document of indexed hits plus the item tree they belong to. Serves
//! as both query executor (a linear scan in document order) and item
//! repository, for the CLI and for tests.

use ahash::{HashMap, HashMapExt};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{HitmergeError, LookupError, QueryError, Result};
use crate::retrieval::{
    empty_stream, Hit, HitPredicate, HitQuery, HitStream, ItemId, ItemRecord, ItemRepository,
    QueryExecutor,
};

/// On-disk corpus layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusDocument {
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// In-memory corpus of hits and items
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    hits: Vec<Hit>,
    items: HashMap<ItemId, ItemRecord>,
}

impl Corpus {
    pub fn from_document(document: CorpusDocument) -> Self {
        let mut items = HashMap::with_capacity(document.items.len());
        for item in document.items {
            if items.insert(item.id, item).is_some() {
                tracing::warn!("Duplicate item record in corpus, keeping the last one");
            }
        }

        Self {
            hits: document.hits,
            items,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: CorpusDocument =
            serde_json::from_str(json).map_err(|e| HitmergeError::Json {
                source: e,
                context: "Failed to parse corpus".to_string(),
            })?;
        Ok(Self::from_document(document))
    }

    /// Load a corpus from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HitmergeError::Io {
            source: e,
            context: format!("Failed to read corpus file: {:?}", path),
        })?;

        let corpus = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded corpus with {} hits and {} items",
            corpus.hits.len(),
            corpus.items.len()
        );
        Ok(corpus)
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl QueryExecutor for Corpus {
    fn execute<'a>(&'a self, query: &HitQuery) -> std::result::Result<HitStream<'a>, QueryError> {
        if query.text.trim().is_empty() {
            return Ok(empty_stream());
        }

        let predicate = HitPredicate::for_query(query)?;
        Ok(Box::new(
            self.hits
                .iter()
                .filter(move |hit| predicate.matches(hit))
                .cloned()
                .map(Ok),
        ))
    }
}

impl ItemRepository for Corpus {
    fn get_item(&self, id: &ItemId) -> std::result::Result<Option<ItemRecord>, LookupError> {
        Ok(self.items.get(id).cloned())
    }
}
