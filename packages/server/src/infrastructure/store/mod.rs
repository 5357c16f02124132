//! SharedStore 実装

pub mod memory;
pub mod redis;

pub use memory::InMemoryStore;
pub use redis::{RedisConfig, RedisStore};
