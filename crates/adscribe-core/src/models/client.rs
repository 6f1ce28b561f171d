use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Client model. A client owns reports and carries the context used when
/// generating them (industry) plus the delivery target (LINE group id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub line_group_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientResponse {
    pub id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub line_group_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for creating a new client
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateClientRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Client name must be between 1 and 255 characters"
    ))]
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub line_group_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request DTO for updating a client. Absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateClientRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 255,
        message = "Client name must be between 1 and 255 characters"
    ))]
    pub name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub line_group_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        ClientResponse {
            id: client.id,
            name: client.name,
            industry: client.industry,
            line_group_id: client.line_group_id,
            notes: client.notes,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}
