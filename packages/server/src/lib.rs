//! Hiroba chat session server library.
//!
//! Tracks connected participants, relays broadcast / private / ephemeral
//! presence events over WebSocket, and keeps per-connection identity state for
//! the lifetime of a session.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
