//! Boundaries to external collaborators.
//!
//! # Responsibility
//! - Define the text-generation and email-dispatch contracts the core calls.
//! - Ship the concrete adapters: a Gemini HTTP client, an offline stand-in,
//!   and a log-backed email dispatcher.
//!
//! # Invariants
//! - Core code depends on the traits only; adapters are chosen at session
//!   start.

pub mod email;
pub mod gemini;
pub mod text_generation;
