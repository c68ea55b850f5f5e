//! Query execution seam and the full-text fallback predicate

use crate::error::QueryError;
use crate::retrieval::{Hit, HitQuery, ItemId};

/// Lazy, ordered sequence of hits. Evaluation failures surface mid-stream.
pub type HitStream<'a> = Box<dyn Iterator<Item = Result<Hit, QueryError>> + 'a>;

/// Executes queries against a search index
pub trait QueryExecutor {
    /// Start evaluating `query`
    ///
    /// Empty query text must yield an empty stream rather than an error.
    /// When `query.scope()` is set, only hits under that root may be produced.
    fn execute<'a>(&'a self, query: &HitQuery) -> Result<HitStream<'a>, QueryError>;
}

/// Stream that yields nothing
pub fn empty_stream<'a>() -> HitStream<'a> {
    Box::new(std::iter::empty())
}

/// Reject query text the index cannot parse
pub fn validate_query_text(text: &str) -> Result<(), QueryError> {
    if text.chars().filter(|c| *c == '"').count() % 2 != 0 {
        return Err(QueryError::malformed(text, "unbalanced phrase quote"));
    }
    Ok(())
}

/// Match rule for the name/content fallback search
///
/// A hit matches when its name starts with the query text, or its content
/// contains the query text (in the requested language, when one is given),
/// and it sits under the query's root scope. Comparisons ignore case.
#[derive(Debug, Clone)]
pub struct HitPredicate {
    needle: String,
    language: Option<String>,
    root: Option<ItemId>,
}

impl HitPredicate {
    pub fn for_query(query: &HitQuery) -> Result<Self, QueryError> {
        validate_query_text(&query.text)?;

        Ok(Self {
            needle: query.text.trim().to_lowercase(),
            language: query.language().map(str::to_owned),
            root: query.scope().copied(),
        })
    }

    pub fn matches(&self, hit: &Hit) -> bool {
        if let Some(root) = &self.root {
            if !hit.is_under(root) {
                return false;
            }
        }

        let name_match = hit
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().starts_with(&self.needle));
        if name_match {
            return true;
        }

        let language_match = self
            .language
            .as_deref()
            .map_or(true, |lang| hit.language == lang);

        language_match && hit.content.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::SearchType;

    #[test]
    fn test_unbalanced_quote_is_malformed() {
        assert!(validate_query_text("\"annual report").is_err());
        assert!(validate_query_text("\"annual report\"").is_ok());
        assert!(validate_query_text("").is_ok());
    }

    #[test]
    fn test_name_prefix_or_content_match() {
        let predicate = HitPredicate::for_query(&HitQuery::new("News", SearchType::Other)).unwrap();
        let id = ItemId::new_v4();

        assert!(predicate.matches(&Hit::new(id, "en", 1).with_name("newsletter")));
        assert!(predicate.matches(&Hit::new(id, "en", 1).with_content("latest news here")));
        assert!(!predicate.matches(&Hit::new(id, "en", 1).with_name("old news")));
    }

    #[test]
    fn test_language_only_restricts_content_match() {
        let query = HitQuery::new("news", SearchType::Other).with_language("da");
        let predicate = HitPredicate::for_query(&query).unwrap();
        let id = ItemId::new_v4();

        assert!(!predicate.matches(&Hit::new(id, "en", 1).with_content("news")));
        assert!(predicate.matches(&Hit::new(id, "da", 1).with_content("news")));
        // Name prefix matches in any language
        assert!(predicate.matches(&Hit::new(id, "en", 1).with_name("news")));
    }

    #[test]
    fn test_root_scope() {
        let root = ItemId::new_v4();
        let inside = Hit::new(ItemId::new_v4(), "en", 1)
            .with_name("news")
            .with_ancestors(vec![root]);
        let outside = Hit::new(ItemId::new_v4(), "en", 1).with_name("news");

        let scoped = HitPredicate::for_query(
            &HitQuery::new("news", SearchType::Classic).with_root(root),
        )
        .unwrap();
        assert!(scoped.matches(&inside));
        assert!(!scoped.matches(&outside));

        let editor = HitPredicate::for_query(
            &HitQuery::new("news", SearchType::ContentEditor).with_root(root),
        )
        .unwrap();
        assert!(editor.matches(&outside));
    }
}
