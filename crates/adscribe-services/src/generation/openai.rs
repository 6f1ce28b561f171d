//! OpenAI chat-completions client (vision)
//!
//! Exactly one call per report generation: no retries, no streaming. The
//! full text is awaited under the client-level timeout, and upstream error
//! messages are surfaced verbatim.

use std::time::Duration;

use adscribe_core::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::generation::GenerationProvider;

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Thin client over the OpenAI chat-completions endpoint.
#[derive(Clone)]
pub struct OpenAiService {
    api_key: String,
    api_base: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiService {
    pub fn new(
        api_key: String,
        api_base: String,
        model: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_base,
            model,
            max_tokens,
            client,
        })
    }

    /// Assemble the two-message payload: fixed system instruction, then a
    /// user message whose content parts are the images first and the text
    /// instruction last.
    pub fn build_report_request(
        &self,
        system_prompt: &str,
        image_data_uris: &[String],
        user_prompt: &str,
    ) -> ChatCompletionRequest {
        let mut parts: Vec<ContentPart> = image_data_uris
            .iter()
            .map(|uri| ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: uri.clone(),
                    detail: "high",
                },
            })
            .collect();
        parts.push(ContentPart::Text {
            text: user_prompt.to_string(),
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(system_prompt.to_string()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(parts),
                },
            ],
            max_tokens: self.max_tokens,
        }
    }

    /// Issue the single generation call and return the raw text block.
    pub async fn execute(&self, request: ChatCompletionRequest) -> Result<String, AppError> {
        let url = format!("{}/chat/completions", self.api_base);

        tracing::debug!(model = %request.model, "Sending generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            // Prefer the structured OpenAI error message when present
            if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&error_text) {
                if let Some(message) = error_json
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                {
                    return Err(AppError::Transport(format!(
                        "OpenAI API error ({}): {}",
                        status, message
                    )));
                }
            }

            return Err(AppError::Transport(format!(
                "OpenAI API request failed: {} - {}",
                status, error_text
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to parse OpenAI response: {}", e)))?;

        // The transport layer does not guard against an empty payload, so
        // the emptiness check is explicit here before anything is persisted.
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AppError::Transport(
                "Generation service returned an empty report".to_string(),
            ));
        }

        Ok(content)
    }
}

#[async_trait]
impl GenerationProvider for OpenAiService {
    async fn generate_report(
        &self,
        system_prompt: &str,
        image_data_uris: &[String],
        user_prompt: &str,
    ) -> Result<String, AppError> {
        let request = self.build_report_request(system_prompt, image_data_uris, user_prompt);
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> OpenAiService {
        OpenAiService::new(
            "sk-test".to_string(),
            "https://api.openai.com/v1".to_string(),
            "gpt-4o-mini".to_string(),
            4000,
            Duration::from_secs(60),
        )
        .unwrap()
    }

    #[test]
    fn test_request_places_images_before_instruction() {
        let images = vec![
            "data:image/png;base64,AAAA".to_string(),
            "data:image/png;base64,BBBB".to_string(),
            "data:image/png;base64,CCCC".to_string(),
        ];
        let request = service().build_report_request("system", &images, "analyze");

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");

        match &request.messages[1].content {
            MessageContent::Parts(parts) => {
                assert_eq!(parts.len(), 4);
                for part in &parts[..3] {
                    assert!(matches!(part, ContentPart::ImageUrl { .. }));
                }
                match &parts[3] {
                    ContentPart::Text { text } => assert_eq!(text, "analyze"),
                    other => panic!("last part must be text, got {:?}", other),
                }
            }
            MessageContent::Text(_) => panic!("user content must be multi-part"),
        }
    }

    #[test]
    fn test_request_serializes_to_openai_wire_shape() {
        let images = vec!["data:image/png;base64,AAAA".to_string()];
        let request = service().build_report_request("sys", &images, "go");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 4000);
        // System message content is a plain string
        assert_eq!(json["messages"][0]["content"], "sys");
        // User parts carry the tagged wire format
        assert_eq!(json["messages"][1]["content"][0]["type"], "image_url");
        assert_eq!(
            json["messages"][1]["content"][0]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
        assert_eq!(
            json["messages"][1]["content"][0]["image_url"]["detail"],
            "high"
        );
        assert_eq!(json["messages"][1]["content"][1]["type"], "text");
    }

    #[test]
    fn test_response_content_extraction() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  report text  "}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        assert_eq!(content, "report text");
    }

    #[test]
    fn test_response_missing_content_yields_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        assert!(content.is_empty());
    }
}
