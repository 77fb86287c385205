//! Core use-case services.
//!
//! # Responsibility
//! - Turn user actions (create goal, send memo, review, comment) into store
//!   mutations with ids, timestamps and access checks applied.
//! - Derive overdue alerts and dashboard figures from store state.
//! - Wrap the text-generation boundary with prompt building and fallbacks.
//!
//! # Invariants
//! - Services never bypass store validation or access policy.
//! - Async results only ever land in drafts, never directly in the store.

pub mod assistant_service;
pub mod dashboard_service;
pub mod draft;
pub mod goal_service;
pub mod memo_service;
pub mod notification_service;
