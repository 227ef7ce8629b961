//! Shared primitive types used across the game.

/// Index of a bag on the board. Bags are numbered `0..bag_count`.
pub type BagId = u32;

/// A stable, unique identifier for one revealed amount.
pub type SessionId = String;

/// A monetary amount in whole dong.
pub type Amount = i64;

/// Milliseconds since the Unix epoch.
pub type TimestampMs = i64;

/// The canonical run identifier.
pub type RunId = String;
