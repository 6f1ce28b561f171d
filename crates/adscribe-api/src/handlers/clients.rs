use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use adscribe_core::models::{ClientResponse, CreateClientRequest, UpdateClientRequest};
use adscribe_core::AppError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/v0/clients",
    tag = "clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_client"))]
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let client = state.db.clients.create_client(request).await?;

    Ok((StatusCode::CREATED, Json(ClientResponse::from(client))))
}

#[utoipa::path(
    get,
    path = "/api/v0/clients",
    tag = "clients",
    responses(
        (status = 200, description = "List of clients", body = Vec<ClientResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_clients"))]
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let clients = state.db.clients.list_clients().await?;

    let responses: Vec<ClientResponse> = clients.into_iter().map(ClientResponse::from).collect();
    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/api/v0/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client found", body = ClientResponse),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(client_id = %id, operation = "get_client"))]
pub async fn get_client(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let client = state
        .db
        .clients
        .get_client(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

    Ok(Json(ClientResponse::from(client)))
}

#[utoipa::path(
    put,
    path = "/api/v0/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(client_id = %id, operation = "update_client"))]
pub async fn update_client(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let client = state.db.clients.update_client(id, request).await?;

    Ok(Json(ClientResponse::from(client)))
}

#[utoipa::path(
    delete,
    path = "/api/v0/clients/{id}",
    tag = "clients",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(client_id = %id, operation = "delete_client"))]
pub async fn delete_client(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let deleted = state.db.clients.delete_client(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Client not found".to_string()).into());
    }

    Ok(StatusCode::NO_CONTENT)
}
