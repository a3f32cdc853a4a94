//! Freshness detection: mtimes for dependencies, age for cached feeds.

pub mod cache;
pub mod mtime;
pub mod policy;

pub use cache::{CacheEntry, CacheStore};
pub use policy::{Freshness, check};
