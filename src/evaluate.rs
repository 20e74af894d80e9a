// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Allocation evaluation: from bindings to an intersected id list.
//!
//! One allocation in, one sorted id list out. Each combination resolves to
//! a posting-list borrow; similarity bindings first rewrite the token into
//! its sibling set and union the siblings' exact lists. Everything then
//! funnels through the intersection primitive.
//!
//! An empty intersection is a perfectly valid outcome - the allocation
//! still counts as evaluated, which is visible to early termination.

use crate::index::Snapshot;
use crate::intersect::{intersect, union};
use crate::types::{Allocation, BundleKind, Id};
use std::borrow::Cow;

/// One evaluated allocation: the binding that produced it and the ids its
/// per-token lists have in common, ascending.
#[derive(Debug, Clone)]
pub(crate) struct Evaluated {
    pub allocation: Allocation,
    pub ids: Vec<Id>,
}

/// Resolve every combination to an id list and intersect.
pub(crate) fn evaluate(snapshot: &Snapshot, allocation: Allocation) -> Evaluated {
    let lists: Vec<Cow<'_, [Id]>> = allocation
        .combinations
        .iter()
        .map(|combination| {
            let category = &snapshot.categories()[combination.category];
            let token = category.lookup_token(&combination.token);
            match combination.bundle {
                BundleKind::Exact => Cow::Borrowed(category.exact.ids_for(&token)),
                BundleKind::Partial => Cow::Borrowed(category.partial.ids_for(&token)),
                BundleKind::Similarity => {
                    // Token-rewriting layer: siblings resolve through the
                    // exact bundle, their lists union ascending.
                    let siblings = category.similarity.similar(&token);
                    let sibling_lists: Vec<&[Id]> = siblings
                        .iter()
                        .map(|sibling| category.exact.ids_for(sibling))
                        .collect();
                    Cow::Owned(union(&sibling_lists))
                }
            }
        })
        .collect();

    let borrowed: Vec<&[Id]> = lists.iter().map(AsRef::as_ref).collect();
    let ids = intersect(&borrowed);

    Evaluated { allocation, ids }
}
