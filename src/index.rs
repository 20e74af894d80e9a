// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index building and the immutable query-side snapshot.
//!
//! The split is one-directional: an [`Index`] is the mutable configuration
//! and record buffer, [`Index::commit`] tokenizes everything into posting
//! stores and emits a [`Snapshot`], and queries only ever see snapshots.
//! There is no mirrored class tree for the two sides - the snapshot *is*
//! the built index, frozen.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **SNAPSHOT_IMMUTABLE**: Nothing mutates a snapshot after `commit`.
//!    Concurrent queries borrow it read-only, no locking on the query path.
//! 2. **POSTING_LIST_SORTED**: `commit` finalizes every bundle; snapshots
//!    never contain unsorted lists.
//! 3. **ATOMIC_SWAP**: [`Indexes::install`] replaces a whole `Arc` under a
//!    write lock. In-flight queries keep their old `Arc` and finish against
//!    the snapshot they started with.

use crate::category::{Category, CategorySpec};
use crate::error::SearchError;
use crate::search::{search, SearchOptions};
use crate::tokenize::Tokenizer;
use crate::types::{Id, QueryToken, SearchResults};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Records per map task in the parallel build.
#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: usize = 1024;

/// One record handed to indexing: an id plus its field values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: Id,
    pub fields: HashMap<String, String>,
}

impl Record {
    pub fn new(id: Id, fields: &[(&str, &str)]) -> Self {
        Record {
            id,
            fields: fields
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
        }
    }
}

/// A named, configurable index being built.
///
/// Configure categories first, then feed records, then [`Index::commit`].
/// Fields without a matching category are ignored; categories whose source
/// field a record lacks simply index nothing for it.
#[derive(Debug, Clone)]
pub struct Index {
    name: String,
    tokenizer: Tokenizer,
    categories: Vec<Category>,
    records: Vec<Record>,
}

impl Index {
    pub fn new(name: &str) -> Self {
        Index::with_tokenizer(name, Tokenizer::new())
    }

    /// An index with a custom tokenizer. The tokenizer is baked into the
    /// snapshot, so queries and data always agree on normalization.
    pub fn with_tokenizer(name: &str, tokenizer: Tokenizer) -> Self {
        Index {
            name: name.to_string(),
            tokenizer,
            categories: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a category. Declaration order is the tie-break order for
    /// equal-score allocations, so it is part of the index's contract.
    pub fn category(&mut self, name: &str, spec: CategorySpec) -> &mut Self {
        self.categories.push(Category::new(name, spec));
        self
    }

    /// Add a location category over a numeric column: queries match records
    /// whose value lies within `radius`, give or take the grid's margin of
    /// error (5-20% for precision 1..=5).
    ///
    /// Pair with a tokenizer that keeps `.` intact (the default strips it),
    /// e.g. `Tokenizer::removing(",;!?\"'()[]")`, or decimal query values
    /// will be mangled before they reach the category.
    pub fn location(&mut self, name: &str, radius: f64, precision: usize) -> &mut Self {
        self.categories
            .push(Category::new_location(name, radius, precision, 0.0));
        self
    }

    /// Add a record. An existing record with the same id is replaced.
    pub fn add(&mut self, id: Id, fields: &[(&str, &str)]) -> &mut Self {
        self.records.retain(|record| record.id != id);
        self.records.push(Record::new(id, fields));
        self
    }

    pub fn add_record(&mut self, record: Record) -> &mut Self {
        self.records.retain(|existing| existing.id != record.id);
        self.records.push(record);
        self
    }

    /// Remove a record before commit. Unknown ids are a no-op.
    pub fn remove(&mut self, id: Id) -> &mut Self {
        self.records.retain(|record| record.id != id);
        self
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Build the immutable snapshot: tokenize every record into every
    /// category, then finalize (sort, dedup, weigh) all stores.
    pub fn commit(&self) -> Snapshot {
        let mut categories: Vec<Category> =
            self.categories.iter().map(Category::config_clone).collect();

        for record in &self.records {
            index_record(&mut categories, record, &self.tokenizer);
        }

        for category in &mut categories {
            category.finalize();
        }

        Snapshot {
            name: self.name.clone(),
            tokenizer: self.tokenizer.clone(),
            categories,
            record_count: self.records.len(),
        }
    }

    /// Parallel commit: map record chunks to per-chunk stores, reduce by
    /// merging, finalize categories in parallel. Worth it from a few
    /// thousand records up; below that, use [`Index::commit`].
    #[cfg(feature = "parallel")]
    pub fn commit_parallel(&self) -> Snapshot {
        // MAP: each chunk builds its own store set
        let partials: Vec<Vec<Category>> = self
            .records
            .par_chunks(PARALLEL_CHUNK)
            .map(|chunk| {
                let mut categories: Vec<Category> =
                    self.categories.iter().map(Category::config_clone).collect();
                for record in chunk {
                    index_record(&mut categories, record, &self.tokenizer);
                }
                categories
            })
            .collect();

        // REDUCE: merge chunk stores left to right
        let mut categories: Vec<Category> =
            self.categories.iter().map(Category::config_clone).collect();
        for partial in partials {
            for (target, source) in categories.iter_mut().zip(partial) {
                target.merge(source);
            }
        }

        categories
            .par_iter_mut()
            .for_each(|category| category.finalize());

        Snapshot {
            name: self.name.clone(),
            tokenizer: self.tokenizer.clone(),
            categories,
            record_count: self.records.len(),
        }
    }

    /// Sequential fallback so callers can use one name throughout.
    #[cfg(not(feature = "parallel"))]
    pub fn commit_parallel(&self) -> Snapshot {
        self.commit()
    }
}

fn index_record(categories: &mut [Category], record: &Record, tokenizer: &Tokenizer) {
    for category in categories.iter_mut() {
        if let Some(text) = record.fields.get(category.source_field()) {
            category.index_text(record.id, text, tokenizer);
        }
    }
}

/// An immutable, fully built index ready for queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    name: String,
    tokenizer: Tokenizer,
    categories: Vec<Category>,
    record_count: usize,
}

impl Snapshot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// The categories a token is allowed to match, as indexes into
    /// `categories()`, ascending.
    ///
    /// Unqualified tokens may match everything. Qualified tokens match the
    /// union of categories answering to any qualifier; qualifiers that
    /// resolve to no category are reported through `unknown`. An empty
    /// return makes the token unsatisfiable and the whole query yields
    /// zero allocations.
    pub fn allowed_categories(
        &self,
        token: &QueryToken,
        unknown: &mut Vec<String>,
    ) -> Vec<usize> {
        let Some(qualifiers) = &token.qualifiers else {
            return (0..self.categories.len()).collect();
        };

        let mut allowed = Vec::new();
        for qualifier in qualifiers {
            let mut matched = false;
            for (position, category) in self.categories.iter().enumerate() {
                if category.answers_to(qualifier) {
                    matched = true;
                    if !allowed.contains(&position) {
                        allowed.push(position);
                    }
                }
            }
            if !matched && !unknown.contains(qualifier) {
                unknown.push(qualifier.clone());
            }
        }
        allowed.sort_unstable();
        allowed
    }
}

/// The registry of installed snapshots, shared across query threads.
///
/// Rebuilds install a fresh snapshot under the same name; the swap is one
/// `Arc` assignment under a short write lock.
#[derive(Default)]
pub struct Indexes {
    snapshots: RwLock<HashMap<String, Arc<Snapshot>>>,
}

impl Indexes {
    pub fn new() -> Self {
        Indexes::default()
    }

    /// Install (or atomically replace) a snapshot under its own name.
    pub fn install(&self, snapshot: Snapshot) {
        let name = snapshot.name().to_string();
        self.snapshots.write().insert(name, Arc::new(snapshot));
    }

    /// The current snapshot for `name`, if installed. The returned `Arc`
    /// stays valid across concurrent swaps.
    pub fn get(&self, name: &str) -> Option<Arc<Snapshot>> {
        self.snapshots.read().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.snapshots.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Run a query against a named index.
    pub fn search(
        &self,
        name: &str,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, SearchError> {
        let snapshot = self
            .get(name)
            .ok_or_else(|| SearchError::UnknownIndex(name.to_string()))?;
        Ok(search(&snapshot, query, options))
    }
}
