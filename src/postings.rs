// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Posting stores: token → sorted ids, token → weight.
//!
//! Each category owns three stores. Exact and partial are both a [`Bundle`]
//! (the partial one holds substring-expanded tokens); similarity is a
//! [`SimilarityBundle`] that only maps phonetic codes to sibling tokens and
//! leans on the exact bundle for the actual ids. Treating similarity as a
//! token-rewriting layer instead of a third posting store keeps the
//! evaluator a single `resolve(tokens) → lists` step.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTING_LIST_SORTED**: After `finalize`, every id list is strictly
//!    ascending with no duplicates.
//! 2. **WEIGHT_PRESENT**: Every token with an id list has a weight entry.
//! 3. **READ_ONLY_AT_QUERY_TIME**: Lookups return borrows; nothing on the
//!    query path mutates a store.

use crate::phonetic::phonetic_code;
use crate::types::Id;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One inverted store: full tokens (exact) or expanded substrings (partial).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bundle {
    ids: HashMap<String, Vec<Id>>,
    weights: HashMap<String, f64>,
}

impl Bundle {
    /// The ascending id list for `token`. Misses return an empty borrow,
    /// never an error.
    #[inline]
    pub fn ids_for(&self, token: &str) -> &[Id] {
        self.ids.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The token's weight, `None` if the token is not in this store.
    #[inline]
    pub fn weight_for(&self, token: &str) -> Option<f64> {
        self.weights.get(token).copied()
    }

    /// Whether `token` has at least one posting here.
    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.ids.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn token_count(&self) -> usize {
        self.ids.len()
    }

    /// Total postings across all tokens.
    pub fn posting_count(&self) -> usize {
        self.ids.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Record `id` under `token`. Build-time only; lists are unsorted until
    /// [`Bundle::finalize`] runs.
    pub(crate) fn insert(&mut self, token: &str, id: Id) {
        self.ids.entry(token.to_string()).or_default().push(id);
    }

    /// Absorb another store's postings. Build-time only; the result needs
    /// a [`Bundle::finalize`] before queries see it.
    pub(crate) fn merge(&mut self, other: Bundle) {
        for (token, mut list) in other.ids {
            self.ids.entry(token).or_default().append(&mut list);
        }
    }

    /// Sort and deduplicate every id list, then derive weights.
    ///
    /// INVARIANT: POSTING_LIST_SORTED, WEIGHT_PRESENT
    ///
    /// The weight is logarithmic in the posting count: common tokens score
    /// higher so allocations binding them are tried first, but growth stays
    /// flat enough that category weights remain the dominant signal.
    pub(crate) fn finalize(&mut self) {
        self.weights.clear();
        for (token, list) in &mut self.ids {
            list.sort_unstable();
            list.dedup();
            self.weights
                .insert(token.clone(), (list.len() as f64).ln());
        }
    }

    /// Well-formedness check for tests and debug assertions.
    #[cfg(any(debug_assertions, test))]
    #[allow(dead_code)]
    pub(crate) fn check_well_formed(&self) -> bool {
        for (token, list) in &self.ids {
            if list.is_empty() {
                return false;
            }
            if !list.windows(2).all(|pair| pair[0] < pair[1]) {
                return false;
            }
            if !self.weights.contains_key(token) {
                return false;
            }
        }
        true
    }
}

/// Maps phonetic codes to the tokens sharing them.
///
/// A lookup never returns ids directly: `similar` yields up to `limit`
/// sibling tokens, each of which the evaluator resolves through the exact
/// bundle. A sibling the exact bundle does not know resolves to an empty
/// list and is harmless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityBundle {
    classes: HashMap<String, Vec<String>>,
    /// Max sibling tokens returned per lookup.
    limit: usize,
}

impl SimilarityBundle {
    pub fn new(limit: usize) -> Self {
        SimilarityBundle {
            classes: HashMap::new(),
            limit,
        }
    }

    /// Up to `limit` sibling tokens sharing `token`'s phonetic code,
    /// excluding `token` itself. Ascending token order for determinism.
    pub fn similar(&self, token: &str) -> Vec<&str> {
        let Some(code) = phonetic_code(token) else {
            return Vec::new();
        };
        let Some(class) = self.classes.get(&code) else {
            return Vec::new();
        };
        class
            .iter()
            .filter(|sibling| sibling.as_str() != token)
            .take(self.limit)
            .map(String::as_str)
            .collect()
    }

    /// Number of distinct phonetic classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Add `token` to its phonetic class. Tokens without a code (pure
    /// numbers, punctuation) are skipped.
    pub(crate) fn insert(&mut self, token: &str) {
        if let Some(code) = phonetic_code(token) {
            self.classes.entry(code).or_default().push(token.to_string());
        }
    }

    /// Max sibling tokens per lookup, as configured.
    pub(crate) fn limit(&self) -> usize {
        self.limit
    }

    /// Absorb another bundle's classes. Build-time only.
    pub(crate) fn merge(&mut self, other: SimilarityBundle) {
        for (code, mut tokens) in other.classes {
            self.classes.entry(code).or_default().append(&mut tokens);
        }
    }

    /// Sort and deduplicate every class.
    pub(crate) fn finalize(&mut self) {
        for class in self.classes.values_mut() {
            class.sort_unstable();
            class.dedup();
        }
    }
}
