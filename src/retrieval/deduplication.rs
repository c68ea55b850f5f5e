//! Replacement rule for hits sharing an identity

use crate::retrieval::{Hit, MergePolicy, SearchType};

/// What to do with an incoming hit whose identity is already retained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateDecision {
    /// Drop the incumbent and append the incoming hit at the end
    Replace,
    /// Keep the incumbent, drop the incoming hit
    Discard,
    /// Keep both (classic listings only)
    Append,
}

/// Decide between an incumbent entry and an incoming hit with the same identity
///
/// A configured preferred language settles the outcome on its own, even in
/// classic mode: the hit in that language wins, otherwise the newer version
/// of the same language wins. Without one, non-classic modes keep only the
/// newest version per language and classic mode lists every version.
pub fn resolve_duplicate(
    incumbent: &Hit,
    incoming: &Hit,
    policy: &MergePolicy,
) -> DuplicateDecision {
    let same_language = incumbent.language == incoming.language;
    let newer = same_language && incumbent.version < incoming.version;

    if let Some(preferred) = policy.preferred_language() {
        let switches_to_preferred =
            incumbent.language != preferred && incoming.language == preferred;
        return if switches_to_preferred || newer {
            DuplicateDecision::Replace
        } else {
            DuplicateDecision::Discard
        };
    }

    match policy.mode {
        SearchType::Classic => DuplicateDecision::Append,
        SearchType::ContentEditor | SearchType::Other => {
            if newer {
                DuplicateDecision::Replace
            } else {
                DuplicateDecision::Discard
            }
        }
    }
}
