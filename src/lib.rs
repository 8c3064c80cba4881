//! Jibber Jabber — terminal client for the conference dialogue game.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend runs the NPCs and owns every game rule. This crate mirrors
//! its state: the roster with per-NPC status, the open conversation and its
//! phase, and overall progress. [`session::GameSession`] is the single
//! controller; the `jibber` binary is one presentation layer on top of it.

pub mod config;
pub mod net;
pub mod pacing;
pub mod phase;
pub mod session;
pub mod state;
