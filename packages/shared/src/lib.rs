//! Utilities shared by Hiroba binaries: logger setup and time helpers.

pub mod logger;
pub mod time;
