// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search orchestrator: allocations in, ranked ids out.
//!
//! A query runs as one synchronous pass: tokenize, resolve qualifiers,
//! enumerate allocations best-first, evaluate each, accumulate ids, slice
//! by offset/limit. Early termination is the interesting part - with it
//! enabled, the orchestrator stops enumerating once the accumulated ids
//! cover the requested slice *and* enough allocations have been looked at.
//!
//! # Early termination
//!
//! Enumeration stops after evaluating allocation `k` (1-based) as soon as
//!
//! ```text
//! acc.len() >= offset + limit   AND   k >= extra_allocations + 1
//! ```
//!
//! `extra_allocations = 0` stops on the first allocation that reaches
//! sufficiency. The default of 1 buys one look-ahead allocation on queries
//! the first allocation already satisfies. Absence of the configuration
//! evaluates everything - "off" is not the same state as `0`.
//!
//! # Id order
//!
//! Within one allocation, ids are emitted descending (newest records
//! first); across allocations, concatenation follows evaluation order. The
//! final slice is `acc[offset..offset + limit]`.

use crate::allocations::AllocationEnumerator;
use crate::evaluate::evaluate;
use crate::index::Snapshot;
use crate::pool;
use crate::types::{AllocationSummary, Id, SearchResults};
use std::time::{Duration, Instant};

/// Ids returned when the caller does not say otherwise.
pub const DEFAULT_LIMIT: usize = 20;

/// Look-ahead allocations for `terminate_early()` without an argument.
pub const DEFAULT_EXTRA_ALLOCATIONS: usize = 1;

/// Per-query knobs. Construct with `SearchOptions::default()` and chain.
///
/// ```
/// use talpa::SearchOptions;
///
/// let options = SearchOptions::default().limit(10).offset(20).terminate_early();
/// ```
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub limit: usize,
    pub offset: usize,
    /// `None` evaluates every allocation. `Some(n)` stops early, allowing
    /// `n` allocations past the first chance to stop.
    pub terminate_early: Option<usize>,
    /// Checked between allocations; expiry returns partial results with
    /// the truncated flag.
    pub deadline: Option<Instant>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            limit: DEFAULT_LIMIT,
            offset: 0,
            terminate_early: None,
            deadline: None,
        }
    }
}

impl SearchOptions {
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Terminate early with the default look-ahead of
    /// [`DEFAULT_EXTRA_ALLOCATIONS`].
    pub fn terminate_early(self) -> Self {
        self.terminate_early_with(DEFAULT_EXTRA_ALLOCATIONS)
    }

    /// Terminate early, allowing exactly `extra_allocations` allocations
    /// past the first chance to stop. Zero stops immediately upon
    /// sufficiency.
    pub fn terminate_early_with(mut self, extra_allocations: usize) -> Self {
        self.terminate_early = Some(extra_allocations);
        self
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline_in(self, budget: Duration) -> Self {
        self.deadline(Instant::now() + budget)
    }
}

/// Run one query against a snapshot.
///
/// Never fails on user input: unparseable or empty queries, unknown
/// qualifiers and expired deadlines all degrade to empty or partial
/// results carrying diagnostics.
pub fn search(snapshot: &Snapshot, query: &str, options: &SearchOptions) -> SearchResults {
    let started = Instant::now();

    let tokens = snapshot.tokenizer().tokenize(query);
    if tokens.is_empty() {
        return SearchResults::empty(options.offset, started.elapsed().as_secs_f64());
    }

    let mut unknown_qualifiers = Vec::new();
    let allowed: Vec<Vec<usize>> = tokens
        .iter()
        .map(|token| snapshot.allowed_categories(token, &mut unknown_qualifiers))
        .collect();

    let needed = options.offset + options.limit;
    let mut summaries: Vec<AllocationSummary> = Vec::new();
    let mut truncated = false;

    // Scratch from the per-thread pool: the accumulator keeps its capacity
    // across queries on this thread.
    let acc_handle = pool::obtain::<Vec<Id>>();
    {
        let mut acc = acc_handle.borrow_mut();
        let mut evaluated = 0usize;

        for allocation in AllocationEnumerator::new(snapshot, &tokens, &allowed) {
            if options
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
            {
                truncated = true;
                break;
            }

            let outcome = evaluate(snapshot, allocation);
            evaluated += 1;

            summaries.push(AllocationSummary {
                score: outcome.allocation.score,
                categories: outcome
                    .allocation
                    .combinations
                    .iter()
                    .map(|combination| {
                        snapshot.categories()[combination.category].name().to_string()
                    })
                    .collect(),
                ids_count: outcome.ids.len(),
            });

            // Per-allocation descending id order
            acc.extend(outcome.ids.iter().rev());

            if let Some(extra) = options.terminate_early {
                if acc.len() >= needed && evaluated >= extra.saturating_add(1) {
                    break;
                }
            }
        }
    }

    let results = {
        let acc = acc_handle.borrow();
        let ids = if options.offset >= acc.len() {
            Vec::new()
        } else {
            acc[options.offset..needed.min(acc.len())].to_vec()
        };
        SearchResults {
            allocations: summaries,
            ids,
            offset: options.offset,
            total: acc.len(),
            duration: started.elapsed().as_secs_f64(),
            truncated,
            unknown_qualifiers,
        }
    };

    pool::release(&acc_handle);
    results
}
