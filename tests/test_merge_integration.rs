//! Merge behaviour over realistic multi-language, multi-version hit streams

use std::cell::Cell;

use hitmerge::retrieval::{merge, Hit, ItemId, MergePolicy, SearchType};
use hitmerge::QueryError;

fn stream(hits: &[Hit]) -> impl Iterator<Item = Result<Hit, QueryError>> + '_ {
    hits.iter().cloned().map(Ok)
}

fn never_hidden(_: &Hit) -> bool {
    false
}

/// Deterministic pseudo-random hit streams covering few identities, so
/// duplicates are frequent
fn generated_streams() -> Vec<Vec<Hit>> {
    let ids: Vec<ItemId> = (0..5).map(|_| ItemId::new_v4()).collect();
    let languages = ["en", "da", "de"];
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..40)
        .map(|_| {
            let len = (next() % 30) as usize;
            (0..len)
                .map(|_| {
                    let id = ids[(next() % ids.len() as u64) as usize];
                    let language = languages[(next() % languages.len() as u64) as usize];
                    let version = (next() % 4) as u32 + 1;
                    Hit::new(id, language, version)
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_cap_invariant_across_modes() {
    for hits in generated_streams() {
        for mode in [SearchType::Classic, SearchType::ContentEditor, SearchType::Other] {
            for cap in [0, 1, 3, 10, 100] {
                for language in [None, Some("da")] {
                    let mut policy = MergePolicy::new(mode, cap);
                    policy.preferred_language = language.map(str::to_owned);

                    let results = merge(stream(&hits), &policy, never_hidden).unwrap();
                    assert!(results.len() <= cap);
                }
            }
        }
    }
}

#[test]
fn test_identity_uniqueness_outside_classic_mode() {
    for hits in generated_streams() {
        for mode in [SearchType::ContentEditor, SearchType::Other] {
            let policy = MergePolicy::new(mode, 100);
            let results = merge(stream(&hits), &policy, never_hidden).unwrap();

            for hit in &results {
                assert_eq!(results.count_of(&hit.item_id), 1);
            }
        }
    }
}

#[test]
fn test_preferred_language_keeps_single_entry_even_in_classic_mode() {
    for hits in generated_streams() {
        let policy = MergePolicy::new(SearchType::Classic, 100).with_preferred_language("da");
        let results = merge(stream(&hits), &policy, never_hidden).unwrap();

        for hit in &results {
            assert_eq!(results.count_of(&hit.item_id), 1);
        }
    }
}

#[test]
fn test_preferred_language_wins_when_present() {
    for hits in generated_streams() {
        let policy = MergePolicy::new(SearchType::Other, 100).with_preferred_language("da");
        let results = merge(stream(&hits), &policy, never_hidden).unwrap();

        for kept in &results {
            let has_danish = hits
                .iter()
                .any(|h| h.item_id == kept.item_id && h.language == "da");
            if has_danish {
                assert_eq!(kept.language, "da");
            }
        }
    }
}

#[test]
fn test_newest_version_retained_per_language() {
    let page = ItemId::new_v4();
    let hits = vec![
        Hit::new(page, "en", 2),
        Hit::new(page, "en", 5),
        Hit::new(page, "en", 3),
    ];

    let policy = MergePolicy::new(SearchType::Other, 10);
    let results = merge(stream(&hits), &policy, never_hidden).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results.hits()[0].version, 5);
}

#[test]
fn test_first_language_sticks_without_preference() {
    let page = ItemId::new_v4();
    let hits = vec![Hit::new(page, "de", 1), Hit::new(page, "en", 9)];

    let policy = MergePolicy::new(SearchType::Other, 10);
    let results = merge(stream(&hits), &policy, never_hidden).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results.hits()[0].language, "de");
}

#[test]
fn test_classic_mode_lists_every_version() {
    let page = ItemId::new_v4();
    let other = ItemId::new_v4();
    let hits = vec![
        Hit::new(page, "en", 1),
        Hit::new(other, "en", 1),
        Hit::new(page, "en", 2),
    ];

    let policy = MergePolicy::new(SearchType::Classic, 10);
    let results = merge(stream(&hits), &policy, never_hidden).unwrap();

    let order: Vec<(ItemId, u32)> = results.iter().map(|h| (h.item_id, h.version)).collect();
    assert_eq!(order, vec![(page, 1), (other, 1), (page, 2)]);
}

#[test]
fn test_hidden_items_never_retained() {
    let hidden = ItemId::new_v4();
    let mut hits: Vec<Hit> = (0..5).map(|v| Hit::new(hidden, "en", v)).collect();
    hits.push(Hit::new(ItemId::new_v4(), "en", 1));

    let policy = MergePolicy::new(SearchType::Other, 1);
    let results = merge(stream(&hits), &policy, |hit| hit.item_id == hidden).unwrap();

    assert_eq!(results.len(), 1);
    assert_ne!(results.hits()[0].item_id, hidden);
    assert_eq!(results.stats().hidden_skipped, 5);
}

#[test]
fn test_cap_zero_never_evaluates_visibility() {
    let checked = Cell::new(0);
    let hits = vec![
        Hit::new(ItemId::new_v4(), "en", 1),
        Hit::new(ItemId::new_v4(), "en", 1),
    ];

    let policy = MergePolicy::new(SearchType::Other, 0);
    let results = merge(stream(&hits), &policy, |_| {
        checked.set(checked.get() + 1);
        false
    })
    .unwrap();

    assert!(results.is_empty());
    assert_eq!(checked.get(), 0);
    assert_eq!(results.stats().consumed, 0);
}

#[test]
fn test_error_after_two_hits_discards_everything() {
    let hits: Vec<Result<Hit, QueryError>> = vec![
        Ok(Hit::new(ItemId::new_v4(), "en", 1)),
        Ok(Hit::new(ItemId::new_v4(), "en", 1)),
        Err(QueryError::evaluation(
            "content:(news",
            anyhow::anyhow!("Cannot parse 'content:(news': Encountered <EOF>"),
        )),
    ];

    let policy = MergePolicy::new(SearchType::Other, 10);
    let err = merge(hits, &policy, never_hidden).unwrap_err();

    assert_eq!(err.query(), "content:(news");
    assert!(err.to_string().contains("Encountered <EOF>"));
}

#[test]
fn test_error_beyond_cap_is_never_reached() {
    let hits: Vec<Result<Hit, QueryError>> = vec![
        Ok(Hit::new(ItemId::new_v4(), "en", 1)),
        Err(QueryError::malformed("x", "unreachable")),
    ];

    let policy = MergePolicy::new(SearchType::Other, 1);
    let results = merge(hits, &policy, never_hidden).unwrap();
    assert_eq!(results.len(), 1);
}
