use adscribe_core::{
    models::{Report, ReportStatus, ReportSummary},
    AppError,
};
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for managing reports.
///
/// Reports are created only after a validated non-empty generated text
/// exists; there is no insert path for an empty draft. Content updates are
/// last-write-wins with no conflict detection.
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a report in draft status for a client
    #[tracing::instrument(skip(self, content), fields(db.table = "reports", db.operation = "insert", client_id = %client_id))]
    pub async fn create_report(
        &self,
        client_id: Uuid,
        content: String,
        report_date: NaiveDate,
    ) -> Result<Report, AppError> {
        let report = sqlx::query_as::<Postgres, Report>(
            r#"
            INSERT INTO reports (client_id, content, report_date, status)
            VALUES ($1, $2, $3, 'draft')
            RETURNING id, client_id, content, report_date, status, created_at, updated_at
            "#,
        )
        .bind(client_id)
        .bind(&content)
        .bind(report_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(report)
    }

    /// Get report by ID
    #[tracing::instrument(skip(self), fields(db.table = "reports", db.operation = "select", db.record_id = %id))]
    pub async fn get_report(&self, id: Uuid) -> Result<Option<Report>, AppError> {
        let report = sqlx::query_as::<Postgres, Report>(
            "SELECT id, client_id, content, report_date, status, created_at, updated_at FROM reports WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(report)
    }

    /// Get report by ID together with the owning client's name
    #[tracing::instrument(skip(self), fields(db.table = "reports", db.operation = "select", db.record_id = %id))]
    pub async fn get_report_with_client(
        &self,
        id: Uuid,
    ) -> Result<Option<(Report, String)>, AppError> {
        #[derive(sqlx::FromRow)]
        struct JoinedRow {
            #[sqlx(flatten)]
            report: Report,
            client_name: String,
        }

        let row = sqlx::query_as::<Postgres, JoinedRow>(
            r#"
            SELECT r.id, r.client_id, r.content, r.report_date, r.status,
                   r.created_at, r.updated_at, c.name AS client_name
            FROM reports r
            JOIN clients c ON c.id = r.client_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| (r.report, r.client_name)))
    }

    /// List report summaries joined with client names, newest first
    #[tracing::instrument(skip(self), fields(db.table = "reports", db.operation = "select"))]
    pub async fn list_reports(
        &self,
        client_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReportSummary>, AppError> {
        let summaries = match client_id {
            Some(cid) => {
                sqlx::query_as::<Postgres, ReportSummary>(
                    r#"
                    SELECT r.id, r.client_id, c.name AS client_name, r.report_date,
                           r.status, r.created_at
                    FROM reports r
                    JOIN clients c ON c.id = r.client_id
                    WHERE r.client_id = $1
                    ORDER BY r.created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(cid)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<Postgres, ReportSummary>(
                    r#"
                    SELECT r.id, r.client_id, c.name AS client_name, r.report_date,
                           r.status, r.created_at
                    FROM reports r
                    JOIN clients c ON c.id = r.client_id
                    ORDER BY r.created_at DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(summaries)
    }

    /// Overwrite report content (allowed in any status, does not change status)
    #[tracing::instrument(skip(self, content), fields(db.table = "reports", db.operation = "update", db.record_id = %id))]
    pub async fn update_content(
        &self,
        id: Uuid,
        content: String,
        report_date: Option<NaiveDate>,
    ) -> Result<Report, AppError> {
        let report = sqlx::query_as::<Postgres, Report>(
            r#"
            UPDATE reports
            SET content = $2,
                report_date = COALESCE($3, report_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, client_id, content, report_date, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&content)
        .bind(report_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

        Ok(report)
    }

    /// Publish a draft report.
    ///
    /// The UPDATE is guarded by `status = 'draft'` so publishing an
    /// already-published report is a no-op: the current row is returned
    /// unchanged instead of flipping or erroring.
    #[tracing::instrument(skip(self), fields(db.table = "reports", db.operation = "update", db.record_id = %id))]
    pub async fn publish_report(&self, id: Uuid) -> Result<Report, AppError> {
        let published = sqlx::query_as::<Postgres, Report>(
            r#"
            UPDATE reports
            SET status = 'published', updated_at = NOW()
            WHERE id = $1 AND status = 'draft'
            RETURNING id, client_id, content, report_date, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(report) = published {
            return Ok(report);
        }

        // Either the report does not exist or it is already published.
        self.get_report(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))
            .map(|report| {
                debug_assert_eq!(report.status, ReportStatus::Published);
                report
            })
    }

    /// Delete a report
    #[tracing::instrument(skip(self), fields(db.table = "reports", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_report(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
