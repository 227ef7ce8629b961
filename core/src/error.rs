use crate::types::BagId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bag {bag_id} not found")]
    BagNotFound { bag_id: BagId },

    #[error("Bag {bag_id} is already opened")]
    BagAlreadyOpened { bag_id: BagId },

    #[error("Ticket for bag {bag_id} does not match the opening in flight")]
    StaleTicket { bag_id: BagId },

    #[error("History total overflows an amount")]
    TotalOverflow,

    #[error("Wish service unavailable: {0}")]
    WishUnavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;
