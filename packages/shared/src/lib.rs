//! Shared utilities for the Hiroba chat relay.
//!
//! This crate holds the pieces both the server and its tests need:
//! time handling with a clock abstraction, and logging setup.

pub mod logger;
pub mod time;
