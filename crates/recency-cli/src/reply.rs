//! Replies printed for each script command

use std::fmt;

use recency::LruCache;
use serde::Serialize;

/// Result of executing one command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum Reply {
    /// Command succeeded with nothing to report
    Ok,
    /// Looked-up value; `None` on a miss
    Value {
        /// The cached value
        value: Option<i64>,
    },
    /// A count (entries, removed keys)
    Integer {
        /// The count
        value: u64,
    },
    /// Keys from most to least recently used
    Keys {
        /// The keys
        keys: Vec<i64>,
    },
    /// Cache counters
    Stats(StatsReport),
    /// Command could not be run
    Error {
        /// What went wrong
        message: String,
    },
}

/// Snapshot of cache counters and occupancy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    /// Lookups that found their key
    pub hits: u64,
    /// Lookups that missed
    pub misses: u64,
    /// New keys inserted
    pub inserts: u64,
    /// Existing keys overwritten
    pub updates: u64,
    /// Entries evicted at capacity
    pub evictions: u64,
    /// Hits over total lookups
    pub hit_ratio: f64,
    /// Live entries
    pub len: usize,
    /// Maximum entries
    pub capacity: usize,
}

impl StatsReport {
    /// Capture the current counters of `cache`
    pub fn capture(cache: &LruCache<i64, i64>) -> Self {
        let stats = cache.stats();
        Self {
            hits: stats.hits(),
            misses: stats.misses(),
            inserts: stats.inserts(),
            updates: stats.updates(),
            evictions: stats.evictions(),
            hit_ratio: stats.hit_ratio(),
            len: cache.len(),
            capacity: cache.capacity(),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Value { value: Some(value) } => write!(f, "{}", value),
            Reply::Value { value: None } => write!(f, "(nil)"),
            Reply::Integer { value } => write!(f, "{}", value),
            Reply::Keys { keys } if keys.is_empty() => write!(f, "(empty)"),
            Reply::Keys { keys } => {
                let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
                write!(f, "{}", keys.join(" "))
            }
            Reply::Stats(report) => write!(
                f,
                "hits={} misses={} inserts={} updates={} evictions={} hit_ratio={:.2} len={} capacity={}",
                report.hits,
                report.misses,
                report.inserts,
                report.updates,
                report.evictions,
                report.hit_ratio,
                report.len,
                report.capacity
            ),
            Reply::Error { message } => write!(f, "ERR {}", message),
        }
    }
}
