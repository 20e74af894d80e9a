//! Result shape: wire key order, totals, diagnostics.

use super::common::{hello_index, library_index};
use std::time::{Duration, Instant};
use talpa::{search, SearchOptions};

#[test]
fn wire_keys_come_in_stable_order() {
    let results = search(&hello_index(), "hello", &SearchOptions::default());
    let json = serde_json::to_string(&results).unwrap();

    let positions: Vec<usize> = ["\"allocations\"", "\"ids\"", "\"offset\"", "\"total\"", "\"duration\""]
        .iter()
        .map(|key| json.find(key).expect(key))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn quiet_flags_stay_off_the_wire() {
    let results = search(&hello_index(), "hello", &SearchOptions::default());
    let json = serde_json::to_string(&results).unwrap();
    assert!(!json.contains("truncated"));
    assert!(!json.contains("unknown_qualifiers"));
}

#[test]
fn diagnostics_appear_when_present() {
    let results = search(&library_index(), "publisher:penguin", &SearchOptions::default());
    let json = serde_json::to_string(&results).unwrap();
    assert!(json.contains("\"unknown_qualifiers\":[\"publisher\"]"));
}

#[test]
fn total_counts_accumulated_ids_not_the_slice() {
    let results = search(&hello_index(), "hello", &SearchOptions::default().limit(2));
    assert_eq!(results.ids.len(), 2);
    assert_eq!(results.total, 24);
}

#[test]
fn total_respects_early_termination() {
    let results = search(
        &hello_index(),
        "hello",
        &SearchOptions::default().limit(3).terminate_early(),
    );
    // Two allocations evaluated → twelve accumulated ids
    assert_eq!(results.total, 12);
}

#[test]
fn offset_is_echoed_back() {
    let results = search(&hello_index(), "hello", &SearchOptions::default().offset(7));
    assert_eq!(results.offset, 7);
}

#[test]
fn duration_is_a_positive_wall_time() {
    let results = search(&hello_index(), "hello", &SearchOptions::default());
    assert!(results.duration >= 0.0);
    assert!(results.duration < 10.0);
}

#[test]
fn deadline_truncation_serializes_the_flag() {
    let options = SearchOptions::default().deadline(Instant::now() - Duration::from_millis(1));
    let results = search(&hello_index(), "hello", &options);
    assert!(results.truncated);
    let json = serde_json::to_string(&results).unwrap();
    assert!(json.contains("\"truncated\":true"));
}

#[test]
fn allocation_summaries_name_categories_per_token() {
    let results = search(&library_index(), "by:carroll alice", &SearchOptions::default());
    assert_eq!(results.allocations.len(), 1);
    assert_eq!(
        results.allocations[0].categories,
        vec!["author".to_string(), "title".to_string()]
    );
    assert_eq!(results.allocations[0].ids_count, 1);
}
