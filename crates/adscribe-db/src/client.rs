use adscribe_core::{
    models::{Client, CreateClientRequest, UpdateClientRequest},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for managing clients
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new client
    #[tracing::instrument(skip(self, request), fields(db.table = "clients", db.operation = "insert"))]
    pub async fn create_client(&self, request: CreateClientRequest) -> Result<Client, AppError> {
        let client = sqlx::query_as::<Postgres, Client>(
            r#"
            INSERT INTO clients (name, industry, line_group_id, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, industry, line_group_id, notes, created_at, updated_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.industry)
        .bind(&request.line_group_id)
        .bind(&request.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    /// Get client by ID
    #[tracing::instrument(skip(self), fields(db.table = "clients", db.operation = "select", db.record_id = %id))]
    pub async fn get_client(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<Postgres, Client>(
            "SELECT id, name, industry, line_group_id, notes, created_at, updated_at FROM clients WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// List all clients ordered by name
    #[tracing::instrument(skip(self), fields(db.table = "clients", db.operation = "select"))]
    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<Postgres, Client>(
            "SELECT id, name, industry, line_group_id, notes, created_at, updated_at FROM clients ORDER BY name ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Update client fields; absent fields are left unchanged
    #[tracing::instrument(skip(self, request), fields(db.table = "clients", db.operation = "update", db.record_id = %id))]
    pub async fn update_client(
        &self,
        id: Uuid,
        request: UpdateClientRequest,
    ) -> Result<Client, AppError> {
        let client = sqlx::query_as::<Postgres, Client>(
            r#"
            UPDATE clients
            SET name = COALESCE($2, name),
                industry = COALESCE($3, industry),
                line_group_id = COALESCE($4, line_group_id),
                notes = COALESCE($5, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, industry, line_group_id, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.industry)
        .bind(&request.line_group_id)
        .bind(&request.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

        Ok(client)
    }

    /// Delete a client. Owned reports are removed by the FK cascade.
    #[tracing::instrument(skip(self), fields(db.table = "clients", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_client(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
