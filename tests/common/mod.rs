//! Shared test fixtures.

#![allow(dead_code)]

use talpa::{CategorySpec, Id, Index, PartialKind, SimilarityKind, Snapshot};

/// The canonical termination fixture: six records {1..6}, four categories
/// {text1..text4}, every record holding "hello" in every category, all
/// weights zero. Every single-token "hello" query produces exactly four
/// equal-score allocations whose intersections are all {1..6}.
pub fn hello_index() -> Snapshot {
    let mut index = Index::new("hello");
    for name in ["text1", "text2", "text3", "text4"] {
        index.category(name, CategorySpec::new());
    }
    for id in 1..=6u32 {
        index.add(
            id,
            &[
                ("text1", "hello"),
                ("text2", "hello"),
                ("text3", "hello"),
                ("text4", "hello"),
            ],
        );
    }
    index.commit()
}

/// A small library index exercising weights, qualifiers, partial and
/// phonetic configuration together.
pub fn library_index() -> Snapshot {
    let mut index = Index::new("library");
    index
        .category("title", CategorySpec::new().weight(1.0))
        .category(
            "author",
            CategorySpec::new()
                .qualifiers(&["author", "by"])
                .similarity(SimilarityKind::Phonetic { n: 5 }),
        )
        .category(
            "isbn",
            CategorySpec::new().partial(PartialKind::Substring { from: 4, to: -1 }),
        );
    index
        .add(
            1,
            &[
                ("title", "Alice in Wonderland"),
                ("author", "Carroll"),
                ("isbn", "9780141439761"),
            ],
        )
        .add(
            2,
            &[
                ("title", "Through the Looking Glass"),
                ("author", "Carroll"),
                ("isbn", "9780141439778"),
            ],
        )
        .add(
            3,
            &[
                ("title", "Peter Pan"),
                ("author", "Barrie"),
                ("isbn", "9780141322575"),
            ],
        );
    index.commit()
}

/// Expected id accumulation for `count` full hello allocations.
pub fn hello_accumulation(count: usize) -> Vec<Id> {
    let mut acc = Vec::with_capacity(count * 6);
    for _ in 0..count {
        acc.extend([6, 5, 4, 3, 2, 1]);
    }
    acc
}
