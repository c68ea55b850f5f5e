//! Capped, identity-aware merging of a hit stream

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{MergeError, QueryError};
use crate::retrieval::{resolve_duplicate, DuplicateDecision, Hit, ItemId, MergePolicy};

/// Counters collected while merging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Hits pulled from the stream
    pub consumed: usize,
    /// Hits withheld as hidden
    pub hidden_skipped: usize,
    /// Hits retained under a new identity
    pub appended: usize,
    /// Incumbents replaced by a preferred hit
    pub replaced: usize,
    /// Hits dropped in favour of their incumbent
    pub discarded: usize,
    /// Extra entries kept for an already retained identity
    pub duplicates: usize,
}

/// Final, ordered merge output
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    hits: Vec<Hit>,
    stats: MergeStats,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hit> {
        self.hits.iter()
    }

    pub fn into_hits(self) -> Vec<Hit> {
        self.hits
    }

    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }

    /// Number of entries for the given identity
    pub fn count_of(&self, id: &ItemId) -> usize {
        self.hits.iter().filter(|hit| hit.item_id == *id).count()
    }
}

impl IntoIterator for ResultSet {
    type Item = Hit;
    type IntoIter = std::vec::IntoIter<Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Hit;
    type IntoIter = std::slice::Iter<'a, Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

/// Shared flag a caller can trip to abandon a merge
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Merge a hit stream into a capped result set
///
/// Stops pulling as soon as `policy.cap` entries are retained, so a cap of
/// zero consumes nothing. Hits for which `is_hidden_and_unauthorized`
/// returns true are skipped and do not count towards the cap. A stream
/// error aborts the merge and discards everything retained so far.
///
/// Replacing an entry moves the replacing hit to the end of the set.
pub fn merge<I, F>(
    hits: I,
    policy: &MergePolicy,
    mut is_hidden_and_unauthorized: F,
) -> Result<ResultSet, QueryError>
where
    I: IntoIterator<Item = Result<Hit, QueryError>>,
    F: FnMut(&Hit) -> bool,
{
    let mut hits = hits.into_iter();
    let mut retained: Vec<Hit> = Vec::new();
    let mut stats = MergeStats::default();

    while retained.len() < policy.cap {
        let hit = match hits.next() {
            Some(hit) => hit?,
            None => break,
        };
        stats.consumed += 1;

        if is_hidden_and_unauthorized(&hit) {
            stats.hidden_skipped += 1;
            continue;
        }

        let Some(position) = retained.iter().position(|r| r.item_id == hit.item_id) else {
            retained.push(hit);
            stats.appended += 1;
            continue;
        };

        match resolve_duplicate(&retained[position], &hit, policy) {
            DuplicateDecision::Replace => {
                retained.remove(position);
                retained.push(hit);
                stats.replaced += 1;
            }
            DuplicateDecision::Discard => stats.discarded += 1,
            DuplicateDecision::Append => {
                retained.push(hit);
                stats.duplicates += 1;
            }
        }
    }

    tracing::debug!(
        consumed = stats.consumed,
        hidden = stats.hidden_skipped,
        appended = stats.appended,
        replaced = stats.replaced,
        discarded = stats.discarded,
        duplicates = stats.duplicates,
        retained = retained.len(),
        cap = policy.cap,
        "Merge complete"
    );

    Ok(ResultSet {
        hits: retained,
        stats,
    })
}

/// Merger bound to one policy, with optional cancellation
pub struct ResultMerger<'a> {
    policy: &'a MergePolicy,
    cancel: Option<CancelToken>,
}

impl<'a> ResultMerger<'a> {
    pub fn new(policy: &'a MergePolicy) -> Self {
        Self {
            policy,
            cancel: None,
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn policy(&self) -> &MergePolicy {
        self.policy
    }

    /// Merge `hits`, checking the cancel token before every pull
    ///
    /// A cancelled merge is reported as [`MergeError::Cancelled`], never as a
    /// partial result.
    pub fn merge<I, F>(
        &self,
        hits: I,
        is_hidden_and_unauthorized: F,
    ) -> Result<ResultSet, MergeError>
    where
        I: IntoIterator<Item = Result<Hit, QueryError>>,
        F: FnMut(&Hit) -> bool,
    {
        let Some(token) = &self.cancel else {
            return Ok(merge(hits, self.policy, is_hidden_and_unauthorized)?);
        };

        let mut hits = hits.into_iter();
        let guarded = std::iter::from_fn(|| {
            if token.is_cancelled() {
                None
            } else {
                hits.next()
            }
        });

        let results = merge(guarded, self.policy, is_hidden_and_unauthorized)?;
        if token.is_cancelled() {
            tracing::debug!("Merge cancelled, discarding {} entries", results.len());
            return Err(MergeError::Cancelled);
        }

        Ok(results)
    }
}
