//! In-memory state layer.
//!
//! # Responsibility
//! - Hold the single authoritative copy of users, goals, memos and
//!   notifications for one session.
//! - Expose the closed set of mutations services may perform.
//!
//! # Invariants
//! - Ids are unique per collection; inserts with a taken id are rejected.
//! - Updates replace the whole entity matched by id and leave the collection
//!   untouched when the id is unknown.

pub mod store;
