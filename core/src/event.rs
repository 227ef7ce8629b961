//! Game events. Every state change is recorded as one of these.

use crate::types::{Amount, BagId, RunId, SessionId, TimestampMs};
use serde::{Deserialize, Serialize};

/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameInitialized {
        run_id:    RunId,
        seed:      u64,
        bag_count: u32,
    },
    BagOpened {
        bag_id:     BagId,
        session_id: SessionId,
        amount:     Amount,
        timestamp:  TimestampMs,
    },
    OpenIgnored {
        bag_id: BagId,
        reason: IgnoreReason,
    },
    BoardReset {
        opened_before: u32,
    },
    SettingsUpdated {
        min_amount: Amount,
        max_amount: Amount,
    },
    RevealDismissed,
    WishDelivered {
        amount:   Amount,
        fallback: bool,
    },
    OpeningCancelled {
        bag_id: BagId,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Another opening is still in flight.
    Busy,
    AlreadyOpened,
}

impl GameEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::GameInitialized { .. } => "game_initialized",
            Self::BagOpened { .. }       => "bag_opened",
            Self::OpenIgnored { .. }     => "open_ignored",
            Self::BoardReset { .. }      => "board_reset",
            Self::SettingsUpdated { .. } => "settings_updated",
            Self::RevealDismissed        => "reveal_dismissed",
            Self::WishDelivered { .. }   => "wish_delivered",
            Self::OpeningCancelled { .. } => "opening_cancelled",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub seq:        u64,
    pub event_type: String,
    pub payload:    String, // JSON-serialized GameEvent
}
