//! Partial and phonetic expansion through the full search path.

use super::common::library_index;
use talpa::{search, CategorySpec, Index, PartialKind, SearchOptions, SimilarityKind, Tokenizer};

#[test]
fn partial_prefix_matches_within_configured_range() {
    let snapshot = library_index();

    // isbn is partial from position 4: a 4-character prefix matches
    let results = search(&snapshot, "9780", &SearchOptions::default());
    assert_eq!(results.ids, vec![3, 2, 1]);

    // but a 3-character prefix is below the range
    let too_short = search(&snapshot, "978", &SearchOptions::default());
    assert!(too_short.ids.is_empty());
}

#[test]
fn longer_prefixes_narrow_the_match() {
    let snapshot = library_index();
    let results = search(&snapshot, "97801414397", &SearchOptions::default());
    assert_eq!(results.ids, vec![2, 1]);

    let exact = search(&snapshot, "9780141439761", &SearchOptions::default());
    assert_eq!(exact.ids, vec![1]);
}

#[test]
fn exact_match_wins_over_partial_expansion() {
    let mut index = Index::new("words");
    index.category(
        "text",
        CategorySpec::new().partial(PartialKind::Substring { from: 1, to: -1 }),
    );
    index
        .add(1, &[("text", "pan")])
        .add(2, &[("text", "panorama")]);
    let snapshot = index.commit();

    let results = search(&snapshot, "pan", &SearchOptions::default());
    // One allocation: "pan" is exact in text, so the partial store (which
    // would widen to the panorama record) is never consulted
    assert_eq!(results.allocations.len(), 1);
    assert_eq!(results.ids, vec![1]);
}

#[test]
fn phonetic_fallback_only_when_exact_and_partial_miss() {
    let mut index = Index::new("names");
    index.category(
        "name",
        CategorySpec::new().similarity(SimilarityKind::Phonetic { n: 5 }),
    );
    index
        .add(1, &[("name", "meier")])
        .add(2, &[("name", "meyer")]);
    let snapshot = index.commit();

    // An indexed spelling resolves exactly: one record
    let exact = search(&snapshot, "meier", &SearchOptions::default());
    assert_eq!(exact.ids, vec![1]);

    // An unindexed sound-alike unions the sibling class: both records
    let fuzzy = search(&snapshot, "maier", &SearchOptions::default());
    assert_eq!(fuzzy.ids, vec![2, 1]);
}

#[test]
fn sibling_limit_caps_the_expansion() {
    let mut index = Index::new("names");
    index.category(
        "name",
        CategorySpec::new().similarity(SimilarityKind::Phonetic { n: 1 }),
    );
    index
        .add(1, &[("name", "mayer")])
        .add(2, &[("name", "meier")])
        .add(3, &[("name", "meyer")]);
    let snapshot = index.commit();

    // Only one sibling is consulted (ascending token order: "mayer")
    let results = search(&snapshot, "maier", &SearchOptions::default());
    assert_eq!(results.ids, vec![1]);
}

#[test]
fn location_category_matches_within_radius() {
    let mut index = Index::with_tokenizer("places", Tokenizer::removing(",;!?\"'()"));
    index.location("lat", 1.0, 3);
    index
        .add(1, &[("lat", "48.30")])
        .add(2, &[("lat", "48.90")])
        .add(3, &[("lat", "53.00")]);
    let snapshot = index.commit();

    let near = search(&snapshot, "48.5", &SearchOptions::default());
    assert!(near.ids.contains(&1));
    assert!(near.ids.contains(&2));
    assert!(!near.ids.contains(&3));

    let far = search(&snapshot, "51.0", &SearchOptions::default());
    assert!(far.ids.is_empty());
}
