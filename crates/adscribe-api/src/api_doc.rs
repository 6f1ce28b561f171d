//! OpenAPI documentation for the management API.
//!
//! The legacy `/api/generate` and `/api/send-line` endpoints are the
//! preserved frontend wire contract and are intentionally not part of the
//! documented schema.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use adscribe_core::models::{
    ClientResponse, CreateClientRequest, ReportResponse, ReportStatus, ReportSummary,
    UpdateClientRequest, UpdateReportRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,
        handlers::reports::list_reports,
        handlers::reports::get_report,
        handlers::reports::update_report,
        handlers::reports::publish_report,
        handlers::reports::distribute_report,
        handlers::reports::delete_report,
    ),
    components(schemas(
        ClientResponse,
        CreateClientRequest,
        UpdateClientRequest,
        ReportResponse,
        ReportSummary,
        ReportStatus,
        UpdateReportRequest,
        handlers::reports::DistributeRequest,
        handlers::reports::DistributeResponse,
        ErrorResponse,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "clients", description = "Client management"),
        (name = "reports", description = "Report lifecycle and distribution")
    )
)]
pub struct ApiDoc;
