// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Allocation enumeration: binding tokens to categories in score order.
//!
//! For N tokens with k allowed categories each, the assignment space is
//! k^N. Materializing and sorting it would defeat early termination, so
//! the enumerator walks it lazily, best-first:
//!
//! 1. Per token, pre-compute the [`Choice`] vector - one entry per allowed
//!    category that matches at all, best bundle only (exact beats partial
//!    beats similarity), sorted descending by score.
//! 2. Seed a max-heap with the all-top-choice assignment.
//! 3. On every pop, emit the assignment and push its successors: each
//!    successor swaps exactly one token down to its next-worse choice.
//!
//! Successor scores never exceed their parent's, so pops leave the heap in
//! non-increasing score order, and the frontier stays bounded by the number
//! of assignments emitted so far times N.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **CHOICES_DESCENDING**: Choice vectors sort by (score desc, bundle
//!    rank desc, category asc). The frontier's correctness depends on it.
//! 2. **SCORE_MONOTONE**: Emitted allocations have non-increasing scores.
//! 3. **DETERMINISTIC_TIES**: Equal scores resolve deterministically -
//!    bundle preference first (exact > partial > similarity, via choice
//!    order), then the category index tuple, lexicographically ascending.
//! 4. **NON_EMPTY**: A token whose choice vector is empty kills the whole
//!    enumeration - no partial allocations.

use crate::index::Snapshot;
use crate::types::{Allocation, BundleKind, Combination, QueryToken};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// One candidate binding for a token: the category, the best bundle the
/// token matches there, and the combined score contribution.
#[derive(Debug, Clone)]
pub(crate) struct Choice {
    pub category: usize,
    pub bundle: BundleKind,
    pub score: f64,
}

/// Pre-compute one token's choice vector over its allowed categories.
///
/// Bundle preference per category: exact if the token is present verbatim,
/// else partial, else similarity if the token has any siblings. Categories
/// matching through no bundle contribute no choice.
fn token_choices(snapshot: &Snapshot, text: &str, allowed: &[usize]) -> Vec<Choice> {
    let mut choices = Vec::new();

    for &position in allowed {
        let category = &snapshot.categories()[position];
        let token = category.lookup_token(text);

        let bound = if category.exact.contains(&token) {
            Some((
                BundleKind::Exact,
                category.exact.weight_for(&token).unwrap_or(0.0),
            ))
        } else if category.partial.contains(&token) {
            Some((
                BundleKind::Partial,
                category.partial.weight_for(&token).unwrap_or(0.0),
            ))
        } else if !category.similarity.similar(&token).is_empty() {
            // Sibling weights are unknowable before resolution; the
            // similarity binding rides on the category weight alone.
            Some((BundleKind::Similarity, 0.0))
        } else {
            None
        };

        if let Some((bundle, token_weight)) = bound {
            choices.push(Choice {
                category: position,
                bundle,
                score: category.weight + token_weight,
            });
        }
    }

    // INVARIANT: CHOICES_DESCENDING
    choices.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(b.bundle.rank().cmp(&a.bundle.rank()))
            .then(a.category.cmp(&b.category))
    });
    choices
}

/// A frontier entry: one assignment, identified by its per-token choice
/// indices, ranked by total score with the category tuple as tie-break.
struct Frontier {
    score: f64,
    /// Category index per token - the deterministic tie-break key.
    key: Vec<usize>,
    /// Choice index per token.
    picks: Vec<usize>,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher score wins; equal scores let the smaller
        // category tuple surface first.
        match self.score.partial_cmp(&other.score) {
            Some(Ordering::Equal) | None => other.key.cmp(&self.key),
            Some(ordering) => ordering,
        }
    }
}

/// Lazily yields [`Allocation`]s in non-increasing score order.
pub(crate) struct AllocationEnumerator {
    tokens: Vec<String>,
    choices: Vec<Vec<Choice>>,
    heap: BinaryHeap<Frontier>,
    seen: HashSet<Vec<usize>>,
}

impl AllocationEnumerator {
    /// `allowed` holds each token's allowed category set, parallel to
    /// `tokens`. Any token without a single matching choice makes the
    /// enumeration empty.
    pub fn new(snapshot: &Snapshot, tokens: &[QueryToken], allowed: &[Vec<usize>]) -> Self {
        let choices: Vec<Vec<Choice>> = tokens
            .iter()
            .zip(allowed)
            .map(|(token, categories)| token_choices(snapshot, &token.text, categories))
            .collect();

        let mut enumerator = AllocationEnumerator {
            tokens: tokens.iter().map(|token| token.text.clone()).collect(),
            choices,
            heap: BinaryHeap::new(),
            seen: HashSet::new(),
        };

        // INVARIANT: NON_EMPTY
        if !enumerator.tokens.is_empty()
            && enumerator.choices.iter().all(|vector| !vector.is_empty())
        {
            let top = vec![0; enumerator.tokens.len()];
            enumerator.push(top);
        }
        enumerator
    }

    fn push(&mut self, picks: Vec<usize>) {
        if !self.seen.insert(picks.clone()) {
            return;
        }
        let mut score = 0.0;
        let mut key = Vec::with_capacity(picks.len());
        for (vector, &pick) in self.choices.iter().zip(&picks) {
            let choice = &vector[pick];
            score += choice.score;
            key.push(choice.category);
        }
        self.heap.push(Frontier { score, key, picks });
    }

    fn allocation_of(&self, entry: &Frontier) -> Allocation {
        let combinations = self
            .tokens
            .iter()
            .zip(self.choices.iter().zip(&entry.picks))
            .map(|(token, (vector, &pick))| {
                let choice = &vector[pick];
                Combination {
                    token: token.clone(),
                    category: choice.category,
                    bundle: choice.bundle,
                }
            })
            .collect();
        Allocation {
            combinations,
            score: entry.score,
        }
    }
}

impl Iterator for AllocationEnumerator {
    type Item = Allocation;

    fn next(&mut self) -> Option<Allocation> {
        let entry = self.heap.pop()?;
        let allocation = self.allocation_of(&entry);

        // Expand: swap each token, one at a time, to its next-worse choice
        for position in 0..entry.picks.len() {
            let next = entry.picks[position] + 1;
            if next < self.choices[position].len() {
                let mut successor = entry.picks.clone();
                successor[position] = next;
                self.push(successor);
            }
        }

        Some(allocation)
    }
}
