use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use adscribe_core::models::{ReportResponse, ReportSummary, UpdateReportRequest};
use adscribe_core::AppError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ReportListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub client_id: Option<Uuid>,
}

fn default_limit() -> i64 {
    50
}

#[utoipa::path(
    get,
    path = "/api/v0/reports",
    tag = "reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "List of reports", body = Vec<ReportSummary>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(operation = "list_reports"))]
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = query.limit.clamp(1, 100);
    let offset = query.offset.max(0);

    let summaries = state
        .db
        .reports
        .list_reports(query.client_id, limit, offset)
        .await?;

    Ok(Json(summaries))
}

#[utoipa::path(
    get,
    path = "/api/v0/reports/{id}",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report found", body = ReportResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(report_id = %id, operation = "get_report"))]
pub async fn get_report(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (report, client_name) = state
        .db
        .reports
        .get_report_with_client(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

    Ok(Json(report.to_response(Some(client_name))))
}

#[utoipa::path(
    put,
    path = "/api/v0/reports/{id}",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = UpdateReportRequest,
    responses(
        (status = 200, description = "Report updated", body = ReportResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(report_id = %id, operation = "update_report"))]
pub async fn update_report(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateReportRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    // Content overwrites are allowed in either status; last write wins.
    let report = state
        .db
        .reports
        .update_content(id, request.content, request.report_date)
        .await?;

    Ok(Json(report.to_response(None)))
}

#[utoipa::path(
    post,
    path = "/api/v0/reports/{id}/publish",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report published (no-op when already published)", body = ReportResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(report_id = %id, operation = "publish_report"))]
pub async fn publish_report(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let report = state.db.reports.publish_report(id).await?;

    Ok(Json(report.to_response(None)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DistributeRequest {
    /// Optional override for the templated message body
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DistributeResponse {
    pub success: bool,
}

#[utoipa::path(
    post,
    path = "/api/v0/reports/{id}/distribute",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = DistributeRequest,
    responses(
        (status = 200, description = "Report link delivered", body = DistributeResponse),
        (status = 400, description = "Client has no LINE group configured", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 502, description = "Delivery failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(report_id = %id, operation = "distribute_report"))]
pub async fn distribute_report(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<DistributeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (report, _client_name) = state
        .db
        .reports
        .get_report_with_client(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

    let client = state
        .db
        .clients
        .get_client(report.client_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

    let group_id = distribution_target(&client)?.to_string();

    let report_url = format!("{}/r/{}", state.config.public_base_url(), report.id);
    let message = match request.message.filter(|m| !m.trim().is_empty()) {
        Some(custom) => custom,
        None => adscribe_services::build_report_message(&client.name, &report_url),
    };

    state.messaging.line.send_text(&group_id, &message).await?;

    Ok(Json(DistributeResponse { success: true }))
}

/// Distribution precondition: the client must have a LINE group configured.
/// Its absence is a user-correctable condition; no delivery call is made.
fn distribution_target(client: &adscribe_core::models::Client) -> Result<&str, AppError> {
    client
        .line_group_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("此客戶尚未設定 LINE 群組 ID".to_string()))
}

#[utoipa::path(
    delete,
    path = "/api/v0/reports/{id}",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(report_id = %id, operation = "delete_report"))]
pub async fn delete_report(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state.db.reports.delete_report(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Report not found".to_string()).into());
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adscribe_core::models::Client;
    use chrono::Utc;

    fn client_with_group(line_group_id: Option<&str>) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "ABC".to_string(),
            industry: Some("電商".to_string()),
            line_group_id: line_group_id.map(String::from),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_distribution_requires_configured_group() {
        let err = distribution_target(&client_with_group(None)).unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "此客戶尚未設定 LINE 群組 ID"),
            other => panic!("expected Validation, got {:?}", other),
        }

        let err = distribution_target(&client_with_group(Some(""))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_distribution_target_returns_group_id() {
        let client = client_with_group(Some("G123"));
        assert_eq!(distribution_target(&client).unwrap(), "G123");
    }
}
