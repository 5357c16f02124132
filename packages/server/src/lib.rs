//! Hiroba chat relay server library.
//!
//! Clients join symbol-scoped rooms over WebSocket, exchange ephemeral text
//! messages, and see presence/typing signals. Room history and usage
//! statistics live in a shared Redis store with bounded lists and expiring
//! keys; in-process state is only a fan-out cache.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
