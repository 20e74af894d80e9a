// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a query: tokens, bundle kinds, allocations, results.
//!
//! These types flow through the whole pipeline. A query string becomes a
//! sequence of [`QueryToken`]s, the enumerator binds each token to a category
//! and a [`BundleKind`] (one [`Combination`] per token), a full set of
//! combinations plus its score is an [`Allocation`], and the orchestrator
//! condenses evaluated allocations into [`SearchResults`].
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Allocation**: `combinations.len()` equals the query's token count.
//!   Every token is bound to exactly one category - partial bindings are
//!   never constructed.
//!
//! - **SearchResults**: `ids.len() <= limit`, and `total` counts every id
//!   accumulated across evaluated allocations before the offset/limit slice.
//!
//! - **Serialization order**: `SearchResults` serializes its keys as
//!   `{allocations, ids, offset, total, duration}`. Clients pin this order;
//!   field order in the struct is load-bearing.

use serde::{Deserialize, Serialize};

/// Record identifier. Integer by convention; snapshots key postings by it.
pub type Id = u32;

/// A normalized text fragment extracted from the query, with the qualifiers
/// the user attached to it (`title:peter` carries `["title"]`).
///
/// Immutable for the life of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryToken {
    pub text: String,
    pub qualifiers: Option<Vec<String>>,
}

impl QueryToken {
    /// Token without qualifiers: allowed to match any category.
    pub fn plain(text: impl Into<String>) -> Self {
        QueryToken {
            text: text.into(),
            qualifiers: None,
        }
    }

    /// Token restricted to the categories named by `qualifiers`.
    pub fn qualified(text: impl Into<String>, qualifiers: Vec<String>) -> Self {
        QueryToken {
            text: text.into(),
            qualifiers: Some(qualifiers),
        }
    }
}

/// Which posting-list variant a token matched at a category.
///
/// The ordering is a ranking: exact beats partial beats similarity when
/// scores tie. `rank()` makes that explicit instead of leaning on the
/// derived `Ord`, which is declaration-order and easy to get backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleKind {
    Exact,
    Partial,
    Similarity,
}

impl BundleKind {
    /// Preference rank used as the secondary sort key in allocation scoring.
    /// Higher is better: exact (2) > partial (1) > similarity (0).
    #[inline]
    pub fn rank(self) -> u8 {
        match self {
            BundleKind::Exact => 2,
            BundleKind::Partial => 1,
            BundleKind::Similarity => 0,
        }
    }

    /// Lowercase string form, matching the serde convention.
    pub fn as_str(self) -> &'static str {
        match self {
            BundleKind::Exact => "exact",
            BundleKind::Partial => "partial",
            BundleKind::Similarity => "similarity",
        }
    }
}

/// One token bound to one category through one bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// Normalized token text as tokenized from the query. Location
    /// categories translate it to a cell token at evaluation time.
    pub token: String,
    /// Index into the snapshot's category list.
    pub category: usize,
    /// The bundle the evaluator will resolve ids through.
    pub bundle: BundleKind,
}

/// An assignment of every query token to a category, with the total score.
///
/// Score is the sum over tokens of `category.weight + bundle token weight`.
/// Allocations leave the enumerator in non-increasing score order; equal
/// scores are ordered by the category index tuple, lexicographically.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub combinations: Vec<Combination>,
    pub score: f64,
}

impl Allocation {
    /// The category index tuple, the deterministic tie-break key.
    pub fn category_key(&self) -> Vec<usize> {
        self.combinations.iter().map(|c| c.category).collect()
    }
}

/// What the wire sees of one evaluated allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub score: f64,
    /// Category name per token, in token order.
    pub categories: Vec<String>,
    /// Size of this allocation's intersection. Zero for empty allocations,
    /// which are still reported - they count against early termination.
    pub ids_count: usize,
}

/// The outcome of one query.
///
/// Field order is the wire key order - do not reorder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    /// Every evaluated allocation, in evaluation order.
    pub allocations: Vec<AllocationSummary>,
    /// The requested slice: `acc[offset..offset + limit]` of the id
    /// concatenation across allocations.
    pub ids: Vec<Id>,
    pub offset: usize,
    /// Ids accumulated across evaluated allocations, before slicing.
    pub total: usize,
    /// Query wall time in seconds.
    pub duration: f64,
    /// Set when a deadline expired between allocations and enumeration
    /// stopped with partial results.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    /// Qualifiers that resolved to no category. Diagnostic, not fatal:
    /// the affected tokens simply match nothing.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_qualifiers: Vec<String>,
}

impl SearchResults {
    /// An empty success (used for queries that tokenize to nothing).
    pub fn empty(offset: usize, duration: f64) -> Self {
        SearchResults {
            allocations: Vec::new(),
            ids: Vec::new(),
            offset,
            total: 0,
            duration,
            truncated: false,
            unknown_qualifiers: Vec::new(),
        }
    }
}
