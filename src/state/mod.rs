//! Client-side view models.
//!
//! DESIGN
//! ======
//! State is split by concern (`roster`, `progress`, `conversation`,
//! `transcript`) so the session controller composes small focused models,
//! each testable on its own.

pub mod conversation;
pub mod progress;
pub mod roster;
pub mod transcript;
