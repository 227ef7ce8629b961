//! Bags and the sessions they reveal.

use crate::{
    error::{GameError, GameResult},
    types::{Amount, BagId, SessionId, TimestampMs},
};
use serde::{Deserialize, Serialize};

/// One revealed amount. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LuckyMoneySession {
    pub id:        SessionId,
    pub amount:    Amount,
    pub timestamp: TimestampMs,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bag {
    pub id:        BagId,
    pub is_opened: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content:   Option<LuckyMoneySession>,
}

impl Bag {
    pub fn new(id: BagId) -> Self {
        Self { id, is_opened: false, content: None }
    }

    /// Mark opened with its revealed session. An opened bag keeps
    /// its first content.
    pub fn open(&mut self, session: LuckyMoneySession) -> GameResult<()> {
        if self.is_opened {
            return Err(GameError::BagAlreadyOpened { bag_id: self.id });
        }
        self.is_opened = true;
        self.content = Some(session);
        Ok(())
    }

    pub fn close(&mut self) {
        self.is_opened = false;
        self.content = None;
    }
}

/// A fresh board of `count` unopened bags, ids `0..count`.
pub fn new_board(count: u32) -> Vec<Bag> {
    (0..count).map(Bag::new).collect()
}
