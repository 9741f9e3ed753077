//! Telegram Bot API types (minimal subset).

use serde::{Deserialize, Serialize};

/// Generic Telegram API response wrapper.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Bot identity returned by `getMe`.
#[derive(Debug, Deserialize)]
pub struct BotInfo {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// The message object returned by `sendPhoto`.
#[derive(Debug, Deserialize)]
pub struct TgMessage {
    pub message_id: i64,
    pub date: i64,
    pub chat: Chat,
}

/// A Telegram chat.
#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
}

/// Parameters for `deleteMessage`.
///
/// `chat_id` is kept as a string so both numeric ids and `@channelname`
/// work unchanged.
#[derive(Debug, Serialize)]
pub struct DeleteMessageParams {
    pub chat_id: String,
    pub message_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_ok() {
        let json = r#"{"ok":true,"result":{"id":123,"is_bot":true,"first_name":"ClassBot"}}"#;
        let resp: ApiResponse<BotInfo> = serde_json::from_str(json).unwrap();
        assert!(resp.ok);
        let bot = resp.result.unwrap();
        assert_eq!(bot.id, 123);
        assert!(bot.is_bot);
    }

    #[test]
    fn test_api_response_error() {
        let json = r#"{"ok":false,"description":"Unauthorized"}"#;
        let resp: ApiResponse<BotInfo> = serde_json::from_str(json).unwrap();
        assert!(!resp.ok);
        assert!(resp.result.is_none());
        assert_eq!(resp.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn test_send_photo_response() {
        let json = r#"{
            "ok": true,
            "result": {
                "message_id": 77,
                "date": 1700000000,
                "chat": {"id": -100123, "type": "channel"}
            }
        }"#;
        let resp: ApiResponse<TgMessage> = serde_json::from_str(json).unwrap();
        let msg = resp.result.unwrap();
        assert_eq!(msg.message_id, 77);
        assert_eq!(msg.chat.chat_type, "channel");
    }

    #[test]
    fn test_delete_message_params_serialize() {
        let params = DeleteMessageParams {
            chat_id: "@my_class".into(),
            message_id: 77,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["chat_id"], "@my_class");
        assert_eq!(json["message_id"], 77);
    }
}
