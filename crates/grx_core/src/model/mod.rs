//! Domain model for goals, memos, users and notifications.
//!
//! # Responsibility
//! - Define the plain records shared by store, policy and services.
//! - Keep derived values (goal progress, attachment size labels) next to the
//!   data they are computed from.
//!
//! # Invariants
//! - Ids are opaque strings issued by an `IdGenerator` and never reused.
//! - Entities are replaced whole on update; there is no field-level patching.

pub mod clock;
pub mod goal;
pub mod ids;
pub mod memo;
pub mod notification;
pub mod user;
pub mod validation;
