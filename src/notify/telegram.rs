//! Report delivery to a Telegram chat.
//!
//! A single HTTP GET against the Bot API with the destination and message in
//! query parameters. No retry, no delivery confirmation: a failed send is
//! reported to the caller once and never re-attempted.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::info;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Telegram API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Query parameters for a `sendMessage` call.
pub fn message_params(chat_id: &str, text: &str, parse_mode: Option<&str>) -> Vec<(String, String)> {
    let mut params = vec![
        ("chat_id".to_string(), chat_id.to_string()),
        ("text".to_string(), text.to_string()),
    ];
    if let Some(mode) = parse_mode {
        params.push(("parse_mode".to_string(), mode.to_string()));
    }
    params
}

/// Wrap a report body in a fixed-width code block for Markdown rendering.
pub fn code_block(text: &str) -> String {
    format!("```\n{text}\n```")
}

pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: &str, timeout_secs: u64) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    /// Point at a different API host. Test hook.
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }

    /// Send the text as-is.
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.send_with(text, None).await
    }

    /// Send the text wrapped in a fixed-width code block, rendered as
    /// Markdown.
    pub async fn send_code_block(&self, text: &str) -> Result<(), NotifyError> {
        self.send_with(&code_block(text), Some("Markdown")).await
    }

    async fn send_with(&self, text: &str, parse_mode: Option<&str>) -> Result<(), NotifyError> {
        let params = message_params(&self.chat_id, text, parse_mode);
        let response = self
            .client
            .get(self.endpoint())
            .query(&params)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        info!(chat_id = %self.chat_id, chars = text.len(), "Report delivered");
        Ok(())
    }
}
