//! Lucky Bag: a festive "lucky money" bag game.
//!
//! A fixed board of bags, each revealing a random amount once opened.
//! Every reveal is appended to a session history whose sum is the
//! running total. An optional wish service asks a generative-text API
//! for a congratulatory message and falls back to a static one.

pub mod amount;
pub mod bag;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod format;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod wish;
