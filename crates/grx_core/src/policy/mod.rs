//! Role-based access rules.
//!
//! # Responsibility
//! - Decide which goals a user may see and which memo reviews they may make.
//! - Offer both predicate (`can_*`) and enforcing (`ensure_*`) entry points
//!   so services reject disallowed actions instead of only hiding controls.
//!
//! # Invariants
//! - Every function here is pure: no store access, no logging.

pub mod access;
