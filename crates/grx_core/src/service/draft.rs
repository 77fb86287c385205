//! Detached editing copies with stale-result protection.
//!
//! A view edits a `Draft<T>` and, before awaiting an async call, takes a
//! `DraftTicket`. When the result arrives it is applied through the ticket,
//! which succeeds only if the same draft is still open at the same
//! generation. Dropping the draft (view dismissed) or resetting it (view
//! reused for another entity) silently invalidates outstanding tickets.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

#[derive(Debug, Default)]
struct DraftState {
    generation: AtomicU64,
}

#[derive(Debug)]
pub struct Draft<T> {
    value: T,
    state: Arc<DraftState>,
}

/// Handle tying an in-flight request to the draft that issued it.
#[derive(Debug, Clone)]
pub struct DraftTicket {
    state: Weak<DraftState>,
    generation: u64,
}

impl DraftTicket {
    /// Whether the issuing draft is still open at the ticket's generation.
    pub fn is_live(&self) -> bool {
        self.state
            .upgrade()
            .is_some_and(|state| state.generation.load(Ordering::Acquire) == self.generation)
    }
}

impl<T> Draft<T> {
    pub fn open(value: T) -> Self {
        Self {
            value,
            state: Arc::new(DraftState::default()),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn ticket(&self) -> DraftTicket {
        DraftTicket {
            state: Arc::downgrade(&self.state),
            generation: self.state.generation.load(Ordering::Acquire),
        }
    }

    /// Runs `update` if `ticket` belongs to this draft and is current.
    ///
    /// Returns `false` (and leaves the draft untouched) for stale tickets.
    pub fn apply<F>(&mut self, ticket: &DraftTicket, update: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let same_draft = std::ptr::eq(ticket.state.as_ptr(), Arc::as_ptr(&self.state));
        if !same_draft || !ticket.is_live() {
            return false;
        }
        update(&mut self.value);
        true
    }

    /// Replaces the contents and invalidates every outstanding ticket.
    pub fn reset(&mut self, value: T) -> T {
        self.state.generation.fetch_add(1, Ordering::AcqRel);
        std::mem::replace(&mut self.value, value)
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
