//! Legacy generation endpoint
//!
//! `POST /api/generate` preserves the original frontend wire contract:
//! camelCase body, `{ success, report }` on 200, and every failure
//! collapsed to 500 with `{ "error": <message> }`. One invocation performs
//! the whole cycle (normalize, generate, sanitize, persist) and the
//! report row exists only if all of it succeeded.

use crate::error::LegacyApiError;
use crate::state::AppState;
use adscribe_core::AppError;
use adscribe_services::{
    ClientContext, GenerateReportInput, ScreenshotInput, TabularAttachment,
};
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub client_id: Uuid,
    #[serde(default)]
    pub screenshots: Vec<ScreenshotInput>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub csv_data: Option<String>,
    #[serde(default)]
    pub csv_file_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub report: GeneratedReport,
}

#[derive(Debug, Serialize)]
pub struct GeneratedReport {
    pub id: Uuid,
    pub data_analysis: String,
}

#[tracing::instrument(
    skip(state, request),
    fields(
        client_id = %request.client_id,
        screenshot_count = request.screenshots.len(),
        operation = "generate_report"
    )
)]
pub async fn generate_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateReportRequest>,
) -> Result<impl IntoResponse, LegacyApiError> {
    let client = state
        .db
        .clients
        .get_client(request.client_id)
        .await?
        .ok_or_else(|| AppError::Validation("找不到客戶".to_string()))?;

    let tabular = request
        .csv_data
        .filter(|data| !data.trim().is_empty())
        .map(|data| TabularAttachment {
            data,
            file_name: request.csv_file_name,
        });

    let input = GenerateReportInput {
        screenshots: request.screenshots,
        client: Some(ClientContext {
            name: Some(client.name),
            industry: client.industry,
        }),
        notes: request.notes,
        tabular,
    };

    let content = state.generation.generator.generate(input).await?;

    // Persist only after a validated non-empty sanitized text exists.
    let report = state
        .db
        .reports
        .create_report(request.client_id, content, Utc::now().date_naive())
        .await?;

    tracing::info!(report_id = %report.id, "Report generated and persisted");

    Ok(Json(GenerateReportResponse {
        success: true,
        report: GeneratedReport {
            id: report.id,
            data_analysis: report.content,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_camel_case_body() {
        let body = serde_json::json!({
            "clientId": "7e2ad9a4-5b3f-4a08-9f6e-1c2d3e4f5a6b",
            "screenshots": [
                "data:image/png;base64,AAAA",
                { "src": "BBBB" }
            ],
            "notes": "年節停播三天",
            "csvData": "campaign,spend\nA,100",
            "csvFileName": "meta.csv"
        });
        let request: GenerateReportRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.screenshots.len(), 2);
        assert_eq!(request.notes.as_deref(), Some("年節停播三天"));
        assert_eq!(request.csv_file_name.as_deref(), Some("meta.csv"));
    }

    #[test]
    fn test_request_defaults_for_optional_fields() {
        let body = serde_json::json!({
            "clientId": "7e2ad9a4-5b3f-4a08-9f6e-1c2d3e4f5a6b"
        });
        let request: GenerateReportRequest = serde_json::from_value(body).unwrap();
        assert!(request.screenshots.is_empty());
        assert!(request.notes.is_none());
        assert!(request.csv_data.is_none());
    }

    #[test]
    fn test_response_wire_shape() {
        let response = GenerateReportResponse {
            success: true,
            report: GeneratedReport {
                id: Uuid::nil(),
                data_analysis: "一、本期重點摘要".to_string(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["report"]["data_analysis"], "一、本期重點摘要");
    }
}
