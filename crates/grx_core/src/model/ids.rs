//! Identifier aliases and generators.
//!
//! # Invariants
//! - A generator never hands out the same id twice within its lifetime.
//! - Ids are opaque; callers must not parse meaning out of them.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

pub type UserId = String;
pub type GoalId = String;
pub type MemoId = String;
pub type NotificationId = String;
pub type CommentId = String;
pub type AttachmentId = String;

/// Source of fresh entity ids.
///
/// Services request an id at the moment a user action fires (create goal,
/// send memo, derive alert).
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUIDv4 ids. Default for live sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic `<prefix>-<n>` ids, starting at 1.
///
/// Deterministic output makes it the generator of choice for tests and demos.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let value = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{value}", self.prefix)
    }
}
