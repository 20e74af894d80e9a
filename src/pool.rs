// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Thread-local pooling of per-query scratch structures.
//!
//! A query allocates a handful of transient buffers: the id accumulator,
//! sibling-union workspace, and friends. Under sustained load those
//! allocations dominate the profile, so the orchestrator draws them from a
//! per-thread pool and hands them back when the query completes.
//!
//! The pool is scoped by type. Each type's scope tracks two sets:
//!
//! - `free`: instances available for recycling
//! - `live`: instances currently handed out
//!
//! [`obtain`] pops a free instance (resetting it) or creates a fresh one,
//! and registers it live. [`release`] moves one instance back to free.
//! [`release_all`] moves a whole type's live set back to free - the
//! end-of-query bulk return. [`drain`] empties every scope on the thread.
//!
//! Handles are `Rc<RefCell<T>>`: the pool keeps its own reference to every
//! live instance, which is what makes `release_all` possible without the
//! caller threading handles around. Thread-local by construction - queries
//! never share scratch across threads, matching the engine's
//! one-thread-per-query model.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A poolable scratch structure.
///
/// `reset` runs on every recycle; implementations clear contents but keep
/// capacity - that retained capacity is the point of pooling.
pub trait Scratch: Default + 'static {
    fn reset(&mut self);
}

impl Scratch for Vec<crate::types::Id> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl Scratch for String {
    fn reset(&mut self) {
        self.clear();
    }
}

#[derive(Default)]
struct Scope {
    free: Vec<Rc<dyn Any>>,
    live: Vec<Rc<dyn Any>>,
}

thread_local! {
    static SCOPES: RefCell<HashMap<TypeId, Scope>> = RefCell::new(HashMap::new());
}

/// Obtain a scratch instance of type `T`: recycled if the free list has
/// one, fresh otherwise. Recycled instances are reset before they are
/// handed out. The instance is tracked live until released.
pub fn obtain<T: Scratch>() -> Rc<RefCell<T>> {
    SCOPES.with(|scopes| {
        let mut scopes = scopes.borrow_mut();
        let scope = scopes.entry(TypeId::of::<T>()).or_default();

        let handle: Rc<RefCell<T>> = match scope.free.pop() {
            Some(instance) => match instance.downcast::<RefCell<T>>() {
                Ok(recycled) => {
                    recycled.borrow_mut().reset();
                    recycled
                }
                // Cannot happen with scopes keyed by TypeId; a fresh
                // instance keeps the code total anyway.
                Err(_) => Rc::new(RefCell::new(T::default())),
            },
            None => Rc::new(RefCell::new(T::default())),
        };

        scope.live.push(handle.clone());
        handle
    })
}

/// Return one instance to its type's free list. Unknown handles (already
/// released, or never obtained here) are ignored.
pub fn release<T: Scratch>(handle: &Rc<RefCell<T>>) {
    let target = Rc::as_ptr(handle) as *const ();
    SCOPES.with(|scopes| {
        let mut scopes = scopes.borrow_mut();
        if let Some(scope) = scopes.get_mut(&TypeId::of::<T>()) {
            if let Some(position) = scope
                .live
                .iter()
                .position(|live| Rc::as_ptr(live) as *const () == target)
            {
                let instance = scope.live.swap_remove(position);
                scope.free.push(instance);
            }
        }
    });
}

/// Drain type `T`'s live set back to free. Other types are untouched.
pub fn release_all<T: Scratch>() {
    SCOPES.with(|scopes| {
        let mut scopes = scopes.borrow_mut();
        if let Some(scope) = scopes.get_mut(&TypeId::of::<T>()) {
            let mut live = std::mem::take(&mut scope.live);
            scope.free.append(&mut live);
        }
    });
}

/// Clear every type scope on this thread, free and live alike.
pub fn drain() {
    SCOPES.with(|scopes| {
        scopes.borrow_mut().clear();
    });
}
