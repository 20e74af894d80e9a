// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Categories: the named logical fields of an index.
//!
//! A category carries its qualifier aliases, a weight contribution for
//! allocation scoring, and the three posting stores a token can match
//! through. Configuration happens before any record is added; after
//! [`crate::Index::commit`] the category is frozen inside a snapshot and
//! only ever read.
//!
//! Two configuration extras beyond the plain text category:
//!
//! - `from` aliases the category's *source* to another field: `author_sound`
//!   can index the `author` column under its own name, weights and
//!   similarity setup.
//! - `location` turns a numeric column into overlapping bucket tokens, so
//!   "within radius r of x" becomes an exact token match (see [`Location`]).

use crate::postings::{Bundle, SimilarityBundle};
use crate::tokenize::Tokenizer;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How a category expands indexed tokens for partial matching.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialKind {
    /// No partial store; the partial bundle stays empty.
    #[default]
    None,
    /// Index every prefix whose length falls in `from..=to`.
    ///
    /// Positions are 1-based; non-positive values count back from the
    /// token's end, Ruby-slice style: `-1` is the full token, `-2` drops
    /// the last character. `Substring { from: 1, to: -1 }` indexes every
    /// prefix.
    Substring { from: i32, to: i32 },
}

/// How a category groups tokens into similarity classes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityKind {
    /// No similarity classes; the similarity lookup always misses.
    #[default]
    None,
    /// Phonetic classes, returning up to `n` sibling tokens per lookup.
    Phonetic { n: usize },
}

/// Configuration for one category, consumed by [`crate::Index::category`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Qualifier aliases. Empty means the category answers to its own name.
    pub qualifiers: Vec<String>,
    pub partial: PartialKind,
    pub similarity: SimilarityKind,
    /// Flat score contribution for every allocation binding this category.
    pub weight: f64,
    /// Index another field's text under this category's name.
    pub from: Option<String>,
}

impl CategorySpec {
    pub fn new() -> Self {
        CategorySpec::default()
    }

    pub fn qualifiers(mut self, qualifiers: &[&str]) -> Self {
        self.qualifiers = qualifiers.iter().map(|q| (*q).to_string()).collect();
        self
    }

    pub fn partial(mut self, partial: PartialKind) -> Self {
        self.partial = partial;
        self
    }

    pub fn similarity(mut self, similarity: SimilarityKind) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn from(mut self, source: &str) -> Self {
        self.from = Some(source.to_string());
        self
    }
}

/// Bucketing grid for numeric columns.
///
/// An indexed value lands in `2 * precision + 1` cells around its own; a
/// query value resolves to a single cell. Two values match when they are
/// within roughly `radius` of each other. The cell size `radius /
/// (precision + 0.5)` bounds the margin of error by `radius / (2 *
/// precision + 1)`, which for precision 1..=5 works out to a 5-20% band
/// around the requested radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    grid: f64,
    precision: usize,
}

impl Location {
    /// `precision` is clamped to 1..=5.
    pub fn new(radius: f64, precision: usize) -> Self {
        let precision = precision.clamp(1, 5);
        Location {
            grid: radius / (precision as f64 + 0.5),
            precision,
        }
    }

    #[inline]
    fn cell(&self, value: f64) -> i64 {
        (value / self.grid).floor() as i64
    }

    /// The cell tokens an indexed value occupies.
    pub fn index_tokens(&self, value: f64) -> Vec<String> {
        let center = self.cell(value);
        let spread = self.precision as i64;
        (center - spread..=center + spread)
            .map(|cell| cell.to_string())
            .collect()
    }

    /// The single cell token a queried value resolves to.
    pub fn query_token(&self, value: f64) -> String {
        self.cell(value).to_string()
    }
}

/// A named logical field with its three posting stores.
///
/// Built mutably during indexing, immutable inside a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    name: String,
    /// Flat allocation-score contribution.
    pub weight: f64,
    qualifiers: Vec<String>,
    partial_kind: PartialKind,
    from: Option<String>,
    location: Option<Location>,
    /// Full-token inverted store. Authoritative for verbatim tokens.
    pub exact: Bundle,
    /// Prefix-expanded inverted store.
    pub partial: Bundle,
    /// Phonetic classes resolved through `exact`.
    pub similarity: SimilarityBundle,
}

impl Category {
    pub(crate) fn new(name: &str, spec: CategorySpec) -> Self {
        let limit = match spec.similarity {
            SimilarityKind::None => 0,
            SimilarityKind::Phonetic { n } => n,
        };
        Category {
            name: name.to_string(),
            weight: spec.weight,
            qualifiers: spec.qualifiers,
            partial_kind: spec.partial,
            from: spec.from,
            location: None,
            exact: Bundle::default(),
            partial: Bundle::default(),
            similarity: SimilarityBundle::new(limit),
        }
    }

    pub(crate) fn new_location(name: &str, radius: f64, precision: usize, weight: f64) -> Self {
        let mut category = Category::new(name, CategorySpec::new().weight(weight));
        category.location = Some(Location::new(radius, precision));
        category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Does this category answer to `qualifier`?
    ///
    /// An explicit alias list replaces the default; otherwise the category
    /// name is its only alias.
    pub fn answers_to(&self, qualifier: &str) -> bool {
        if self.qualifiers.is_empty() {
            self.name == qualifier
        } else {
            self.qualifiers.iter().any(|alias| alias == qualifier)
        }
    }

    /// The record field this category reads at indexing time.
    pub fn source_field(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.name)
    }

    /// Translate a query token into store space.
    ///
    /// Location categories map numeric tokens to their grid cell; every
    /// other category looks tokens up verbatim.
    pub fn lookup_token<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match (&self.location, text.parse::<f64>()) {
            (Some(location), Ok(value)) => Cow::Owned(location.query_token(value)),
            _ => Cow::Borrowed(text),
        }
    }

    /// Index one record field's text under `id`.
    pub(crate) fn index_text(&mut self, id: crate::types::Id, text: &str, tokenizer: &Tokenizer) {
        if let Some(location) = &self.location {
            // Numeric column: bypass the text tokenizer (punctuation
            // stripping would mangle "48.30") and bucket each number.
            for word in text.split_whitespace() {
                if let Ok(value) = word.parse::<f64>() {
                    for cell in location.index_tokens(value) {
                        self.exact.insert(&cell, id);
                    }
                }
            }
            return;
        }

        for token in tokenizer.index_tokens(text) {
            self.index_token(id, &token);
        }
    }

    fn index_token(&mut self, id: crate::types::Id, token: &str) {
        self.exact.insert(token, id);

        if let PartialKind::Substring { from, to } = self.partial_kind {
            for prefix in substring_expansions(token, from, to) {
                self.partial.insert(&prefix, id);
            }
        }

        self.similarity.insert(token);
    }

    /// A copy of this category's configuration with empty stores. The unit
    /// of work for the parallel build's map phase.
    pub(crate) fn config_clone(&self) -> Category {
        Category {
            name: self.name.clone(),
            weight: self.weight,
            qualifiers: self.qualifiers.clone(),
            partial_kind: self.partial_kind,
            from: self.from.clone(),
            location: self.location.clone(),
            exact: Bundle::default(),
            partial: Bundle::default(),
            similarity: SimilarityBundle::new(self.similarity.limit()),
        }
    }

    /// Absorb another config-identical category's stores (reduce phase).
    pub(crate) fn merge(&mut self, other: Category) {
        self.exact.merge(other.exact);
        self.partial.merge(other.partial);
        self.similarity.merge(other.similarity);
    }

    pub(crate) fn finalize(&mut self) {
        self.exact.finalize();
        self.partial.finalize();
        self.similarity.finalize();
    }
}

/// The prefixes of `token` whose lengths fall in the configured range.
///
/// `from`/`to` are 1-based character positions; non-positive values count
/// back from the end (`-1` = full length).
fn substring_expansions(token: &str, from: i32, to: i32) -> Vec<String> {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len == 0 {
        return Vec::new();
    }

    let resolve = |position: i32| -> i32 {
        if position > 0 {
            position
        } else {
            len as i32 + 1 + position
        }
    };

    let lo = resolve(from).clamp(1, len as i32) as usize;
    let hi = resolve(to).clamp(lo as i32, len as i32) as usize;

    (lo..=hi)
        .map(|l| chars[..l].iter().collect())
        .collect()
}
