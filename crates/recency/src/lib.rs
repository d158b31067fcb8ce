//! # recency
//!
//! Fixed-capacity key-value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **Recency list**: arena-backed doubly-linked list, front = most recent (O(1) promote/evict)
//! - **Lookup index**: AHash map from key to list handle (O(1) lookup)
//! - **Cache**: keeps both in lockstep on every get, put and eviction
//!
//! ```
//! use recency::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put(1, "one");
//! cache.put(2, "two");
//! assert_eq!(cache.get(&1), Some(&"one"));
//!
//! cache.put(3, "three"); // evicts 2
//! assert_eq!(cache.get(&2), None);
//! # Ok::<(), recency::Error>(())
//! ```
//!
//! The cache is single-threaded; wrap it in a mutex for shared use.

#![warn(missing_docs)]

mod cache;
mod error;
pub mod index;
pub mod list;
mod stats;

pub use cache::LruCache;
pub use error::{Error, Result};
pub use stats::CacheStats;
