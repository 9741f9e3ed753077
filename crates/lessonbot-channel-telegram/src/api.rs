//! Telegram Bot API HTTP client.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use reqwest::Client;
use reqwest::multipart::{Form, Part};

use crate::types::{ApiResponse, BotInfo, DeleteMessageParams, TgMessage};

/// HTTP client for the Telegram Bot API.
pub struct TelegramApi {
    client: Client,
    base_url: String,
}

impl TelegramApi {
    /// Create a new API client with the given bot token.
    pub fn new(bot_token: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            base_url: format!("https://api.telegram.org/bot{bot_token}"),
        }
    }

    /// Verify the bot token by calling `getMe`.
    pub async fn get_me(&self) -> anyhow::Result<BotInfo> {
        let resp: ApiResponse<BotInfo> = self
            .client
            .get(format!("{}/getMe", self.base_url))
            .send()
            .await
            .context("getMe request failed")?
            .json()
            .await
            .context("getMe response parse failed")?;

        if !resp.ok {
            bail!(
                "getMe failed: {}",
                resp.description.unwrap_or_else(|| "unknown error".into())
            );
        }
        resp.result.context("getMe returned no result")
    }

    /// Post a photo with a caption. Returns the created message.
    pub async fn send_photo(
        &self,
        chat_id: &str,
        caption: &str,
        photo_path: &Path,
    ) -> anyhow::Result<TgMessage> {
        let photo = tokio::fs::read(photo_path)
            .await
            .with_context(|| format!("failed to read photo {}", photo_path.display()))?;
        let file_name = photo_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".into());

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", Part::bytes(photo).file_name(file_name));

        let resp: ApiResponse<TgMessage> = self
            .client
            .post(format!("{}/sendPhoto", self.base_url))
            .multipart(form)
            .send()
            .await
            .context("sendPhoto request failed")?
            .json()
            .await
            .context("sendPhoto response parse failed")?;

        if !resp.ok {
            bail!(
                "sendPhoto failed: {}",
                resp.description.unwrap_or_else(|| "unknown error".into())
            );
        }
        resp.result.context("sendPhoto returned no result")
    }

    /// Delete a previously sent message.
    pub async fn delete_message(&self, params: &DeleteMessageParams) -> anyhow::Result<()> {
        let resp: ApiResponse<bool> = self
            .client
            .post(format!("{}/deleteMessage", self.base_url))
            .json(params)
            .send()
            .await
            .context("deleteMessage request failed")?
            .json()
            .await
            .context("deleteMessage response parse failed")?;

        if !resp.ok {
            bail!(
                "deleteMessage failed: {}",
                resp.description.unwrap_or_else(|| "unknown error".into())
            );
        }
        Ok(())
    }
}
