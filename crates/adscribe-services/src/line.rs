//! LINE messaging delivery
//!
//! Push-style delivery of a report link to a client's LINE group. The core
//! treats this as `send(group_id, text) -> ok | error`; delivery failures
//! surface the upstream status verbatim and are never retried here.

use std::time::Duration;

use adscribe_core::AppError;
use serde::Serialize;

const PUSH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: Vec<PushMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct PushMessage<'a> {
    #[serde(rename = "type")]
    message_type: &'static str,
    text: &'a str,
}

/// Client for the LINE bot push API.
#[derive(Clone)]
pub struct LineMessagingService {
    channel_access_token: Option<String>,
    api_base: String,
    client: reqwest::Client,
}

impl LineMessagingService {
    pub fn new(channel_access_token: Option<String>, api_base: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PUSH_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            channel_access_token,
            api_base,
            client,
        })
    }

    /// Push a text message to a LINE group.
    #[tracing::instrument(skip(self, text), fields(group_id = %group_id))]
    pub async fn send_text(&self, group_id: &str, text: &str) -> Result<(), AppError> {
        let token = self.channel_access_token.as_ref().ok_or_else(|| {
            AppError::Configuration("LINE_CHANNEL_ACCESS_TOKEN not configured".to_string())
        })?;

        let body = PushRequest {
            to: group_id,
            messages: vec![PushMessage {
                message_type: "text",
                text,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v2/bot/message/push", self.api_base))
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Transport(format!(
                "LINE API 錯誤: {}",
                response.status().as_u16()
            )));
        }

        tracing::info!("LINE message delivered");
        Ok(())
    }
}

/// Fixed distribution template: headline with the client name, greeting,
/// the public report link, and a sign-off.
pub fn build_report_message(client_name: &str, report_url: &str) -> String {
    format!(
        "📊 {client} 廣告週報\n\n您好，本週的廣告成效報告已經準備好了！\n\n🔗 完整報告請點擊以下連結：\n{url}\n\n如有任何問題，歡迎隨時聯繫我們。",
        client = client_name,
        url = report_url,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_without_token_is_configuration_error() {
        let service =
            LineMessagingService::new(None, "https://api.line.me".to_string()).unwrap();
        let err = service.send_text("G123", "hello").await.unwrap_err();
        match err {
            AppError::Configuration(msg) => {
                assert!(msg.contains("LINE_CHANNEL_ACCESS_TOKEN"));
            }
            other => panic!("expected Configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_report_message_embeds_name_and_url() {
        let message = build_report_message("ABC", "https://reports.example.com/r/abc123");
        assert!(message.contains("ABC 廣告週報"));
        assert!(message.contains("https://reports.example.com/r/abc123"));
    }

    #[test]
    fn test_push_request_wire_shape() {
        let body = PushRequest {
            to: "G123",
            messages: vec![PushMessage {
                message_type: "text",
                text: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["to"], "G123");
        assert_eq!(json["messages"][0]["type"], "text");
        assert_eq!(json["messages"][0]["text"], "hi");
    }
}
