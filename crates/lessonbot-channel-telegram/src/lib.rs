//! Telegram publisher for lesson announcements.
//!
//! Posts each announcement with `sendPhoto` and retracts it with
//! `deleteMessage`. The caption carries the subject name followed by its
//! reference links, one per line:
//!
//! ```text
//! Math
//! https://example.com/algebra
//! https://example.com/homework
//! ```

pub mod api;
pub mod types;

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use lessonbot_schedule::Publisher;
use lessonbot_types::{DeliveryId, SubjectEntry};

use api::TelegramApi;
use types::DeleteMessageParams;

/// [`Publisher`] backed by the Telegram Bot API.
pub struct TelegramPublisher {
    api: TelegramApi,
}

impl TelegramPublisher {
    pub fn new(bot_token: &str) -> Self {
        Self {
            api: TelegramApi::new(bot_token),
        }
    }

    /// Verify the bot token before the loop starts, so a bad token fails
    /// at startup instead of at the first lesson.
    pub async fn authenticate(&self) -> anyhow::Result<()> {
        let bot = self.api.get_me().await?;
        info!(
            bot_username = bot.username.as_deref().unwrap_or("unknown"),
            "Telegram bot authenticated"
        );
        Ok(())
    }
}

/// Caption layout: subject name, then each link on its own line.
fn build_caption(subject_name: &str, entry: &SubjectEntry) -> String {
    let mut caption = subject_name.to_string();
    for link in &entry.links {
        caption.push('\n');
        caption.push_str(link);
    }
    caption
}

#[async_trait]
impl Publisher for TelegramPublisher {
    async fn send(
        &self,
        subject_name: &str,
        entry: &SubjectEntry,
        channel_id: &str,
    ) -> anyhow::Result<DeliveryId> {
        let caption = build_caption(subject_name, entry);
        let message = self
            .api
            .send_photo(channel_id, &caption, Path::new(&entry.image_path))
            .await?;
        Ok(DeliveryId(message.message_id))
    }

    async fn delete(&self, delivery: DeliveryId, channel_id: &str) -> anyhow::Result<()> {
        self.api
            .delete_message(&DeleteMessageParams {
                chat_id: channel_id.to_string(),
                message_id: delivery.0,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_without_links() {
        let entry = SubjectEntry {
            image_path: "pe.png".into(),
            links: vec![],
        };
        assert_eq!(build_caption("PE", &entry), "PE");
    }

    #[test]
    fn test_caption_with_links() {
        let entry = SubjectEntry {
            image_path: "math.png".into(),
            links: vec![
                "https://example.com/algebra".into(),
                "https://example.com/homework".into(),
            ],
        };
        assert_eq!(
            build_caption("Math", &entry),
            "Math\nhttps://example.com/algebra\nhttps://example.com/homework"
        );
    }
}
