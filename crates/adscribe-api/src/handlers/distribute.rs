//! Legacy delivery endpoint
//!
//! `POST /api/send-line` preserves the original wire contract: camelCase
//! body with `groupId` and `message`, `{ "success": true }` on delivery,
//! and every failure collapsed to 500 with `{ "error": <message> }`.

use crate::error::LegacyApiError;
use crate::state::AppState;
use adscribe_core::AppError;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLineRequest {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn validate_request(request: SendLineRequest) -> Result<(String, String), AppError> {
    match (
        request.group_id.filter(|s| !s.is_empty()),
        request.message.filter(|s| !s.is_empty()),
    ) {
        (Some(group_id), Some(message)) => Ok((group_id, message)),
        _ => Err(AppError::Validation("缺少 groupId 或 message".to_string())),
    }
}

#[tracing::instrument(skip(state, request), fields(operation = "send_line"))]
pub async fn send_line(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendLineRequest>,
) -> Result<impl IntoResponse, LegacyApiError> {
    // Fail fast on either missing field; no delivery call is attempted.
    let (group_id, message) = validate_request(request)?;

    state.messaging.line.send_text(&group_id, &message).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_camel_case_body() {
        let body = serde_json::json!({ "groupId": "G123", "message": "hello" });
        let request: SendLineRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.group_id.as_deref(), Some("G123"));
        assert_eq!(request.message.as_deref(), Some("hello"));
    }

    #[test]
    fn test_request_tolerates_missing_fields() {
        let request: SendLineRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(request.group_id.is_none());
        assert!(request.message.is_none());
    }

    #[test]
    fn test_missing_or_empty_field_is_validation_error() {
        let cases = [
            (None, Some("hello".to_string())),
            (Some("G123".to_string()), None),
            (Some("".to_string()), Some("hello".to_string())),
            (None, None),
        ];
        for (group_id, message) in cases {
            let err = validate_request(SendLineRequest { group_id, message }).unwrap_err();
            match err {
                AppError::Validation(msg) => assert_eq!(msg, "缺少 groupId 或 message"),
                other => panic!("expected Validation, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_complete_request_passes() {
        let (group_id, message) = validate_request(SendLineRequest {
            group_id: Some("G123".to_string()),
            message: Some("hello".to_string()),
        })
        .unwrap();
        assert_eq!(group_id, "G123");
        assert_eq!(message, "hello");
    }
}
