// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Categorical full-text search with weighted allocations and early termination.
//!
//! Talpa indexes structured records field by field and answers free-form
//! queries with ranked record ids. The ranking unit is the *allocation*: an
//! assignment of every query token to one category, scored by category
//! weights plus token weights. Allocations are enumerated best-first and
//! evaluated by intersecting posting lists, so the engine can stop as soon
//! as the requested result slice is covered.
//!
//! # Architecture
//!
//! ```text
//! query text
//!     │
//!     ▼
//! ┌─────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │ tokenize.rs │───▶│    index.rs      │───▶│ allocations.rs  │
//! │ (qualifier  │    │ (qualifier →     │    │ (best-first     │
//! │  syntax)    │    │  category sets)  │    │  frontier)      │
//! └─────────────┘    └──────────────────┘    └────────┬────────┘
//!                                                     │ score order
//!                                                     ▼
//! ┌─────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │ search.rs   │◀───│   evaluate.rs    │◀───│  postings.rs    │
//! │ (offset/    │    │ (bundle resolve, │    │ (exact/partial/ │
//! │  limit,     │    │  intersect.rs)   │    │  similarity)    │
//! │  early stop)│    └──────────────────┘    └─────────────────┘
//! └─────────────┘
//! ```
//!
//! Indexing is the mirror-free half: an [`Index`] collects configuration
//! and records, [`Index::commit`] emits an immutable [`Snapshot`], and
//! queries borrow snapshots read-only - concurrently, without locks.
//!
//! # Usage
//!
//! ```
//! use talpa::{CategorySpec, Index, SearchOptions, search};
//!
//! let mut index = Index::new("books");
//! index
//!     .category("title", CategorySpec::new().weight(1.0))
//!     .category("author", CategorySpec::new());
//! index
//!     .add(1, &[("title", "Peter Pan"), ("author", "Barrie")])
//!     .add(2, &[("title", "Peter Rabbit"), ("author", "Potter")]);
//!
//! let snapshot = index.commit();
//! let results = search(&snapshot, "title:peter", &SearchOptions::default());
//! assert_eq!(results.ids, vec![2, 1]);
//! ```

// Module declarations
mod allocations;
mod category;
mod error;
mod evaluate;
mod index;
mod intersect;
mod phonetic;
pub mod pool;
mod postings;
mod search;
mod snapshot;
mod tokenize;
mod types;
mod utils;

// Re-exports for public API
pub use category::{Category, CategorySpec, Location, PartialKind, SimilarityKind};
pub use error::SearchError;
pub use index::{Index, Indexes, Record, Snapshot};
pub use intersect::{intersect, intersect_hinted, union};
pub use phonetic::phonetic_code;
pub use postings::{Bundle, SimilarityBundle};
pub use search::{search, SearchOptions, DEFAULT_EXTRA_ALLOCATIONS, DEFAULT_LIMIT};
pub use tokenize::Tokenizer;
pub use types::{
    Allocation, AllocationSummary, BundleKind, Combination, Id, QueryToken, SearchResults,
};
pub use utils::normalize;
