use crate::types::Amount;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BAG_COUNT: u32 = 12;
pub const DEFAULT_MIN_AMOUNT: Amount = 10_000;
pub const DEFAULT_MAX_AMOUNT: Amount = 50_000;
pub const DEFAULT_OPENING_DELAY_MS: u64 = 600;

pub const DEFAULT_WISH_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_WISH_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// User-editable amount range. Bounds may arrive in either order;
/// they are only ordered when an amount is drawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub min_amount: Amount,
    pub max_amount: Amount,
}

impl Settings {
    pub fn new(min_amount: Amount, max_amount: Amount) -> Self {
        Self { min_amount, max_amount }
    }

    /// The range as (low, high), whatever order it was entered in.
    pub fn bounds(&self) -> (Amount, Amount) {
        (
            self.min_amount.min(self.max_amount),
            self.min_amount.max(self.max_amount),
        )
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_AMOUNT, DEFAULT_MAX_AMOUNT)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// Uniform draw over the settings range, rounded to the thousand.
    #[default]
    Range,
    /// Weighted pick from the denomination table.
    Denominations,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Denomination {
    pub amount: Amount,
    pub weight: f64,
}

pub fn default_denominations() -> Vec<Denomination> {
    vec![
        Denomination { amount: 10_000, weight: 0.4 },
        Denomination { amount: 20_000, weight: 0.3 },
        Denomination { amount: 30_000, weight: 0.2 },
        Denomination { amount: 50_000, weight: 0.1 },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WishConfig {
    pub enabled: bool,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub top_p: f64,
    pub timeout_secs: u64,
}

impl Default for WishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: "API_KEY".to_string(),
            model: DEFAULT_WISH_MODEL.to_string(),
            base_url: DEFAULT_WISH_BASE_URL.to_string(),
            temperature: 0.8,
            top_p: 0.95,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub bag_count: u32,
    pub settings: Settings,
    pub opening_delay_ms: u64,
    pub draw_mode: DrawMode,
    pub denominations: Vec<Denomination>,
    pub wish: WishConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bag_count: DEFAULT_BAG_COUNT,
            settings: Settings::default(),
            opening_delay_ms: DEFAULT_OPENING_DELAY_MS,
            draw_mode: DrawMode::default(),
            denominations: default_denominations(),
            wish: WishConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    /// In tests, use GameConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GameConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::debug!(
            "config loaded from {path}: bags={} range={}..{} mode={:?}",
            config.bag_count,
            config.settings.min_amount,
            config.settings.max_amount,
            config.draw_mode
        );
        Ok(config)
    }
}
