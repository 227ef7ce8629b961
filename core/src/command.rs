use crate::types::{Amount, BagId};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    OpenBag { bag_id: BagId },
    Reset,
    UpdateSettings {
        min_amount: Amount,
        max_amount: Amount,
    },
    DismissReveal,
}

impl PlayerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenBag { .. }        => "open_bag",
            Self::Reset                 => "reset",
            Self::UpdateSettings { .. } => "update_settings",
            Self::DismissReveal         => "dismiss_reveal",
        }
    }
}
