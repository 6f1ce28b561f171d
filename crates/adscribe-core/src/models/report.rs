use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Report lifecycle status.
///
/// The only transition exposed anywhere is `Draft` → `Published`; publishing
/// an already-published report leaves it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Draft,
    Published,
}

impl ReportStatus {
    /// Whether a publish request changes anything for a report in this state.
    pub fn can_publish(self) -> bool {
        matches!(self, ReportStatus::Draft)
    }
}

/// Report model. Content is markdown produced by the generation pipeline
/// and may be overwritten by manual edits in either status.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub client_id: Uuid,
    pub content: String,
    pub report_date: NaiveDate,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: Option<String>,
    pub content: String,
    pub report_date: NaiveDate,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List-view row: report joined with its owning client's name, without the
/// full markdown body.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ReportSummary {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub report_date: NaiveDate,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for overwriting report content
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateReportRequest {
    #[validate(length(min = 1, message = "Report content must not be empty"))]
    pub content: String,
    #[serde(default)]
    pub report_date: Option<NaiveDate>,
}

impl Report {
    pub fn to_response(self, client_name: Option<String>) -> ReportResponse {
        ReportResponse {
            id: self.id,
            client_id: self.client_id,
            client_name,
            content: self.content,
            report_date: self.report_date,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
