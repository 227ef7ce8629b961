//! Snapshot serialization of the full visible game state as JSON.
//!
//! This is what a front end renders: the board, the history panel,
//! the running total and the reveal currently on screen.

use crate::{
    bag::{Bag, LuckyMoneySession},
    config::Settings,
    types::{Amount, RunId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub run_id:         RunId,
    pub bags:           Vec<Bag>,
    /// Newest first.
    pub history:        Vec<LuckyMoneySession>,
    pub total:          Amount,
    pub settings:       Settings,
    pub is_opening:     bool,
    pub current_reveal: Option<LuckyMoneySession>,
}
