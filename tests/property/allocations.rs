//! Orchestration invariants over randomly generated corpora.

use proptest::prelude::*;
use talpa::{search, CategorySpec, Index, SearchOptions, Snapshot};

const VOCAB: &[&str] = &["alpha", "beta", "gamma", "delta"];

#[derive(Debug, Clone)]
struct Corpus {
    /// Per record: one small word list per category.
    records: Vec<Vec<Vec<usize>>>,
    category_count: usize,
}

fn corpus_strategy() -> impl Strategy<Value = Corpus> {
    (2usize..=3).prop_flat_map(|category_count| {
        prop::collection::vec(
            prop::collection::vec(
                prop::collection::vec(0usize..VOCAB.len(), 1..4),
                category_count,
            ),
            1..8,
        )
        .prop_map(move |records| Corpus {
            records,
            category_count,
        })
    })
}

fn build(corpus: &Corpus) -> Snapshot {
    let names: Vec<String> = (0..corpus.category_count)
        .map(|position| format!("cat{}", position))
        .collect();

    let mut index = Index::new("random");
    for name in &names {
        index.category(name, CategorySpec::new());
    }
    for (record_position, fields) in corpus.records.iter().enumerate() {
        let texts: Vec<String> = fields
            .iter()
            .map(|words| {
                words
                    .iter()
                    .map(|&word| VOCAB[word])
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        let named: Vec<(&str, &str)> = names
            .iter()
            .map(String::as_str)
            .zip(texts.iter().map(String::as_str))
            .collect();
        index.add(record_position as u32 + 1, &named);
    }
    index.commit()
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(0usize..VOCAB.len(), 1..3)
        .prop_map(|words| words.into_iter().map(|w| VOCAB[w]).collect::<Vec<_>>().join(" "))
}

proptest! {
    /// Without early termination, the id count is exactly
    /// min(limit, Σ |intersection|) over all evaluated allocations.
    #[test]
    fn id_count_matches_accumulation((corpus, query, limit) in (corpus_strategy(), query_strategy(), 0usize..12)) {
        let snapshot = build(&corpus);
        let results = search(&snapshot, &query, &SearchOptions::default().limit(limit));

        let accumulated: usize = results.allocations.iter().map(|a| a.ids_count).sum();
        prop_assert_eq!(results.total, accumulated);
        prop_assert_eq!(results.ids.len(), limit.min(accumulated));
    }

    /// Allocation scores never increase along the evaluation order.
    #[test]
    fn scores_are_non_increasing((corpus, query) in (corpus_strategy(), query_strategy())) {
        let snapshot = build(&corpus);
        let results = search(&snapshot, &query, &SearchOptions::default());
        for pair in results.allocations.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    /// The offset slice is exactly the suffix of the logical concatenation.
    #[test]
    fn offset_slices_the_logical_concatenation(
        (corpus, query, offset) in (corpus_strategy(), query_strategy(), 0usize..20),
    ) {
        let snapshot = build(&corpus);
        let full = search(&snapshot, &query, &SearchOptions::default().limit(1000));
        let sliced = search(
            &snapshot,
            &query,
            &SearchOptions::default().offset(offset).limit(5),
        );

        let expected: Vec<u32> = full
            .ids
            .iter()
            .skip(offset)
            .take(5)
            .copied()
            .collect();
        prop_assert_eq!(sliced.ids, expected);
    }

    /// Early termination never changes the ids inside the requested slice
    /// when the slice is covered.
    #[test]
    fn early_termination_preserves_the_slice(
        (corpus, query, limit) in (corpus_strategy(), query_strategy(), 1usize..6),
    ) {
        let snapshot = build(&corpus);
        let lazy = search(
            &snapshot,
            &query,
            &SearchOptions::default().limit(limit).terminate_early(),
        );
        let eager = search(&snapshot, &query, &SearchOptions::default().limit(limit));

        prop_assert_eq!(lazy.ids, eager.ids);
        prop_assert!(lazy.allocations.len() <= eager.allocations.len());
    }

    /// Every returned id was indexed.
    #[test]
    fn returned_ids_exist((corpus, query) in (corpus_strategy(), query_strategy())) {
        let snapshot = build(&corpus);
        let results = search(&snapshot, &query, &SearchOptions::default());
        let record_count = corpus.records.len() as u32;
        for id in &results.ids {
            prop_assert!((1..=record_count).contains(id));
        }
    }
}
