//! # recency-cli
//!
//! Replays line-oriented `PUT`/`GET` scripts against a [`recency::LruCache`]
//! and prints one reply per command.

#![warn(missing_docs)]

pub mod command;
pub mod reply;
pub mod session;

pub use command::{parse_line, Command, ParseError};
pub use reply::{Reply, StatsReport};
pub use session::{OutputFormat, RunSummary, Session, DEMO_SCRIPT};
