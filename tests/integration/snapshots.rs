//! Dump, load, and registry swap behavior.

use super::common::{hello_index, library_index};
use std::sync::Arc;
use talpa::{search, Index, Indexes, SearchError, SearchOptions, Snapshot};

#[test]
fn loaded_snapshot_answers_like_the_original() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.talpa");

    let original = library_index();
    original.dump(&path).unwrap();
    let loaded = Snapshot::load(&path).unwrap();

    for query in ["alice", "by:carroll", "9780141439", "author:carrol"] {
        let a = search(&original, query, &SearchOptions::default());
        let b = search(&loaded, query, &SearchOptions::default());
        assert_eq!(a.ids, b.ids, "query '{}' diverged after load", query);
        assert_eq!(a.allocations, b.allocations);
    }
}

#[test]
fn load_failures_are_typed() {
    let dir = tempfile::tempdir().unwrap();

    let missing = Snapshot::load(&dir.path().join("nowhere.talpa"));
    assert!(matches!(missing, Err(SearchError::SnapshotMissing { .. })));

    let garbage_path = dir.path().join("garbage.talpa");
    std::fs::write(&garbage_path, "definitely not json\nat all").unwrap();
    let garbage = Snapshot::load(&garbage_path);
    assert!(matches!(garbage, Err(SearchError::SnapshotCorrupt { .. })));
}

#[test]
fn registry_searches_by_name() {
    let indexes = Indexes::new();
    indexes.install(hello_index());
    indexes.install(library_index());

    let hello = indexes
        .search("hello", "hello", &SearchOptions::default().limit(2))
        .unwrap();
    assert_eq!(hello.ids, vec![6, 5]);

    let library = indexes
        .search("library", "alice", &SearchOptions::default())
        .unwrap();
    assert_eq!(library.ids, vec![1]);

    let unknown = indexes.search("nope", "query", &SearchOptions::default());
    assert!(matches!(unknown, Err(SearchError::UnknownIndex(name)) if name == "nope"));
}

#[test]
fn swap_is_atomic_for_in_flight_holders() {
    let indexes = Indexes::new();
    indexes.install(hello_index());

    // Simulates an in-flight query holding the snapshot across a rebuild
    let held: Arc<Snapshot> = indexes.get("hello").unwrap();

    let mut rebuilt = Index::new("hello");
    rebuilt.category("text1", talpa::CategorySpec::new());
    rebuilt.add(99, &[("text1", "hello")]);
    indexes.install(rebuilt.commit());

    // The holder still sees six records; new queries see the rebuild
    let old = search(&held, "hello", &SearchOptions::default());
    assert_eq!(old.total, 24);

    let new = indexes
        .search("hello", "hello", &SearchOptions::default())
        .unwrap();
    assert_eq!(new.ids, vec![99]);
}

#[test]
fn concurrent_queries_share_one_snapshot() {
    let snapshot = Arc::new(hello_index());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let snapshot = Arc::clone(&snapshot);
            std::thread::spawn(move || {
                let limit = worker % 4 + 1;
                let results = search(
                    &snapshot,
                    "hello",
                    &SearchOptions::default().limit(limit).terminate_early(),
                );
                assert_eq!(results.ids.len(), limit);
                assert_eq!(results.ids[0], 6);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
