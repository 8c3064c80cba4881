//! Networking modules for the dialogue backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles the REST calls and `types` defines the wire schema.

pub mod api;
pub mod types;
