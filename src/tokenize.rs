// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query and index tokenization.
//!
//! Both sides of the engine run text through the same [`Tokenizer`] so that
//! indexed tokens and query tokens land in the same normal form. The query
//! side additionally understands the qualifier syntax:
//!
//! ```text
//! title:peter          one qualifier
//! title,author:peter   two qualifiers, either may match
//! peter                no qualifiers - matches any category
//! ```
//!
//! Rules: split on whitespace, lowercase, strip configured punctuation,
//! drop empty tokens. Qualifier prefixes are split off before punctuation
//! stripping, so a configured `:` would not break the syntax.

use crate::types::QueryToken;
use crate::utils::normalize;
use serde::{Deserialize, Serialize};

/// Characters stripped from tokens unless configured otherwise.
const DEFAULT_REMOVED: &str = ",.;!?\"'()[]";

/// Splits raw text into normalized tokens.
///
/// Cheap to clone; snapshots embed their tokenizer so a loaded index
/// tokenizes queries exactly the way it tokenized its data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokenizer {
    /// Punctuation characters removed from every token.
    removed: String,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer {
            removed: DEFAULT_REMOVED.to_string(),
        }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer::default()
    }

    /// A tokenizer that strips exactly `removed` from tokens.
    pub fn removing(removed: &str) -> Self {
        Tokenizer {
            removed: removed.to_string(),
        }
    }

    /// Tokenize query text, resolving the qualifier syntax.
    ///
    /// `title:peter` yields text `peter` with qualifiers `["title"]`;
    /// `title,author:peter` yields qualifiers `["title", "author"]`.
    /// Tokens that are empty after cleaning are dropped, qualifiers or not.
    pub fn tokenize(&self, query: &str) -> Vec<QueryToken> {
        query
            .split_whitespace()
            .filter_map(|word| self.token_of(word))
            .collect()
    }

    /// Tokenize index-side text. No qualifier syntax: a colon in the data
    /// is data.
    pub fn index_tokens(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|word| self.clean(word))
            .filter(|token| !token.is_empty())
            .collect()
    }

    fn token_of(&self, word: &str) -> Option<QueryToken> {
        if let Some((head, rest)) = word.split_once(':') {
            let qualifiers: Vec<String> = head
                .split(',')
                .map(|q| self.clean(q))
                .filter(|q| !q.is_empty())
                .collect();
            let text = self.clean(rest);
            if text.is_empty() {
                return None;
            }
            if qualifiers.is_empty() {
                // ":peter" - degenerate prefix, treat as unqualified
                return Some(QueryToken::plain(text));
            }
            return Some(QueryToken::qualified(text, qualifiers));
        }

        let text = self.clean(word);
        if text.is_empty() {
            None
        } else {
            Some(QueryToken::plain(text))
        }
    }

    /// Strip configured punctuation, then normalize (lowercase, diacritics).
    fn clean(&self, raw: &str) -> String {
        let stripped: String = raw
            .chars()
            .filter(|c| !self.removed.contains(*c))
            .collect();
        normalize(&stripped)
    }
}
