//! Search pipeline step
//!
//! Runs one host search request end to end: decides whether the bucketed
//! engine handles it at all, executes the query, merges the hit stream and
//! appends formatted results to the request's output sink.

use std::sync::Arc;

use crate::config::Config;
use crate::display::{DisplayFormatter, SearchResults, SettingsProvider};
use crate::error::MergeError;
use crate::retrieval::{
    CancelToken, HiddenItemFilter, HitQuery, ItemId, ItemRepository, MergePolicy, QueryExecutor,
    ResultMerger, SearchType,
};

/// Request bundle handed over by the host pipeline
#[derive(Debug, Clone)]
pub struct SearchArgs {
    pub text_query: String,
    /// Content language; same-item hits in this language win
    pub content_language: Option<String>,
    /// Limit results to this item's subtree
    pub root: Option<ItemId>,
    pub search_type: SearchType,
    /// Result cap
    pub limit: usize,
    /// Set by the host, or by the processor when bucketed search is off
    pub use_legacy_search_engine: bool,
    pub result: SearchResults,
}

impl SearchArgs {
    pub fn new(text_query: impl Into<String>, search_type: SearchType, limit: usize) -> Self {
        Self {
            text_query: text_query.into(),
            content_language: None,
            root: None,
            search_type,
            limit,
            use_legacy_search_engine: false,
            result: SearchResults::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.content_language = Some(language.into());
        self
    }

    pub fn with_root(mut self, root: ItemId) -> Self {
        self.root = Some(root);
        self
    }

    fn query(&self) -> HitQuery {
        HitQuery {
            text: self.text_query.clone(),
            language: self.content_language.clone(),
            root: self.root,
            search_type: self.search_type,
        }
    }

    fn policy(&self) -> MergePolicy {
        MergePolicy {
            preferred_language: self.content_language.clone(),
            mode: self.search_type,
            cap: self.limit,
        }
    }
}

/// What a call to [`SearchProcessor::process`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The host already chose the legacy engine
    Legacy,
    /// Bucketed search is disabled; the request was flagged for the legacy engine
    Delegated,
    /// Empty query text, nothing to do
    EmptyQuery,
    /// The query failed; no results were added
    QueryFailed,
    /// The merge was cancelled; no results were added
    Cancelled,
    Completed {
        /// Entries retained by the merge
        merged: usize,
        /// Results appended to the sink after formatting
        added: usize,
    },
}

/// Processor switches taken from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorOptions {
    pub bucketed_search_enabled: bool,
    pub show_hidden_items: bool,
}

impl ProcessorOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bucketed_search_enabled: config.search.bucketed_search_enabled,
            show_hidden_items: config.view.show_hidden_items,
        }
    }
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            bucketed_search_enabled: true,
            show_hidden_items: false,
        }
    }
}

/// Pipeline step backed by an index, a content repository and settings
pub struct SearchProcessor {
    executor: Arc<dyn QueryExecutor>,
    repository: Arc<dyn ItemRepository>,
    settings: Arc<dyn SettingsProvider>,
    options: ProcessorOptions,
    cancel: Option<CancelToken>,
}

impl SearchProcessor {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        repository: Arc<dyn ItemRepository>,
        settings: Arc<dyn SettingsProvider>,
        options: ProcessorOptions,
    ) -> Self {
        Self {
            executor,
            repository,
            settings,
            options,
            cancel: None,
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Run the request, appending results to `args.result`
    pub fn process(&self, args: &mut SearchArgs) -> ProcessOutcome {
        if args.use_legacy_search_engine {
            return ProcessOutcome::Legacy;
        }

        if !self.options.bucketed_search_enabled {
            tracing::debug!("Bucketed search disabled, delegating to legacy engine");
            args.use_legacy_search_engine = true;
            return ProcessOutcome::Delegated;
        }

        if args.text_query.is_empty() {
            return ProcessOutcome::EmptyQuery;
        }

        let query = args.query();
        let policy = args.policy();

        let hits = match self.executor.execute(&query) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::error!(query = %args.text_query, "Invalid search query: {}", e);
                return ProcessOutcome::QueryFailed;
            }
        };

        let visibility = HiddenItemFilter::new(&*self.repository, self.options.show_hidden_items);
        let mut merger = ResultMerger::new(&policy);
        if let Some(token) = &self.cancel {
            merger = merger.with_cancel_token(token.clone());
        }

        let merged = match merger.merge(hits, |hit| visibility.excludes(hit)) {
            Ok(merged) => merged,
            Err(MergeError::Query(e)) => {
                tracing::error!(query = %args.text_query, "Invalid search query: {}", e);
                return ProcessOutcome::QueryFailed;
            }
            Err(MergeError::Cancelled) => {
                tracing::debug!(query = %args.text_query, "Search cancelled");
                return ProcessOutcome::Cancelled;
            }
        };

        let formatter = DisplayFormatter::new(&*self.repository, &*self.settings);
        let formatted = formatter.format_all(&merged);
        let added = formatted.len();
        args.result.extend(formatted);

        tracing::debug!(
            query = %args.text_query,
            merged = merged.len(),
            added,
            "Search completed"
        );

        ProcessOutcome::Completed {
            merged: merged.len(),
            added,
        }
    }
}
