use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::alert::AlertSink;
use crate::config::Config;
use crate::constants::DEFAULT_TELEGRAM_API_URL;
use crate::error::AlertError;

/// Delivers alerts to a Telegram chat through the Bot API
pub struct TelegramSink {
    client: Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramSink {
    pub fn new(bot_token: &str, chat_id: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Telegram HTTP client")?;

        Ok(Self {
            client,
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.telegram_bot_token, &config.telegram_chat_id, config.request_timeout())?
            .with_api_url(config.telegram_api_url()))
    }

    /// Point the sink at another Bot API server
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

#[async_trait]
impl AlertSink for TelegramSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);

        let res = self
            .client
            .post(&url)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", message)])
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(AlertError::Status {
                status: status.as_u16(),
                body,
            });
        }

        log::debug!("Alert delivered to chat {}", self.chat_id);
        Ok(())
    }
}
