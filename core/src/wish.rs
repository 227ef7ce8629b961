//! Congratulatory wishes from the Gemini REST API.
//!
//! `generate_wish` never fails: any error, a missing key or an empty
//! reply turns into one of two static messages.

use crate::{
    config::WishConfig,
    error::{GameError, GameResult},
    format::format_amount,
    types::Amount,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shown when the call fails or cannot be made.
pub const ERROR_FALLBACK_WISH: &str = "Chúc mừng năm mới! Phát tài phát lộc, tiền vô như nước!";
/// Shown when the call succeeds but returns no text.
pub const EMPTY_FALLBACK_WISH: &str = "Chúc bạn một năm mới an khang thịnh vượng, vạn sự như ý!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wish {
    pub text:     String,
    /// True when `text` is one of the static messages.
    pub fallback: bool,
}

impl Wish {
    fn fallback(text: &str) -> Self {
        Self { text: text.to_string(), fallback: true }
    }
}

pub fn build_prompt(amount: Amount) -> String {
    format!(
        "Hãy viết một câu chúc Tết ngắn gọn, vui nhộn và ý nghĩa cho người vừa nhận được lì xì {} VNĐ. \
         Câu chúc nên mang âm hưởng Tết Giáp Thìn 2024 hoặc Ất Tỵ 2025.",
        format_amount(amount)
    )
}

#[derive(Clone)]
pub struct WishService {
    client:  Client,
    config:  WishConfig,
    api_key: Option<String>,
}

impl WishService {
    /// A service with no API key; every wish is the fallback until
    /// `with_api_key` is called.
    pub fn new(config: WishConfig) -> GameResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config, api_key: None })
    }

    /// Reads the key from the variable named by `api_key_env`.
    pub fn from_env(config: WishConfig) -> GameResult<Self> {
        let key = std::env::var(&config.api_key_env).ok();
        if key.is_none() {
            log::debug!("wish: {} not set, wishes will use the fallback", config.api_key_env);
        }
        let service = Self::new(config)?;
        Ok(match key {
            Some(key) => service.with_api_key(key),
            None => service,
        })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.config.enabled && self.api_key.is_some()
    }

    /// Ask the model for a wish. Empty text is returned as is.
    pub async fn request_wish(&self, amount: Amount) -> GameResult<String> {
        if !self.config.enabled {
            return Err(GameError::WishUnavailable("wishes are disabled".into()));
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GameError::WishUnavailable("no API key".into()))?;

        let url = format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                role:  "user".to_string(),
                parts: vec![Part { text: build_prompt(amount) }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p:       self.config.top_p,
            },
        };

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(GameError::WishUnavailable(format!(
                "status {status}: {}",
                error_message(&body_text)
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(extract_text(parsed))
    }

    /// A wish for `amount`, falling back to a static message.
    pub async fn generate_wish(&self, amount: Amount) -> Wish {
        match self.request_wish(amount).await {
            Ok(text) if text.trim().is_empty() => Wish::fallback(EMPTY_FALLBACK_WISH),
            Ok(text) => Wish { text: text.trim().to_string(), fallback: false },
            Err(e) => {
                log::warn!("wish: falling back for {amount}: {e}");
                Wish::fallback(ERROR_FALLBACK_WISH)
            }
        }
    }
}

// ── Wire types ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents:          Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role:  String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p:       f64,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Text parts of the first candidate, joined.
fn extract_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|w| w.error.message)
        .unwrap_or_else(|| body.chars().take(200).collect())
}
