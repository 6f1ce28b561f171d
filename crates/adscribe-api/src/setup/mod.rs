//! Application initialization: database, services, routes.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use adscribe_core::Config;
use adscribe_db::{ClientRepository, ReportRepository};
use adscribe_services::{LineMessagingService, ReportGenerator};
use anyhow::Result;
use axum::Router;

use crate::state::{AppState, DbState, GenerationState, MessagingState};

/// Build the application state and router from configuration.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let pool = database::setup_database(&config).await?;

    let db = DbState {
        clients: ClientRepository::new(pool.clone()),
        reports: ReportRepository::new(pool.clone()),
        pool,
    };

    let generation = GenerationState {
        generator: ReportGenerator::from_config(&config)
            .map_err(|e| anyhow::anyhow!("Failed to build report generator: {}", e))?,
    };

    if config.openai_api_key().is_none() {
        tracing::warn!("OPENAI_API_KEY not set; report generation will fail until configured");
    }
    if config.line_channel_access_token().is_none() {
        tracing::warn!("LINE_CHANNEL_ACCESS_TOKEN not set; distribution will fail until configured");
    }

    let messaging = MessagingState {
        line: LineMessagingService::new(
            config.line_channel_access_token().map(String::from),
            config.line_api_base().to_string(),
        )
        .map_err(|e| anyhow::anyhow!("Failed to build LINE client: {}", e))?,
    };

    let is_production = config.is_production();
    let state = Arc::new(AppState {
        db,
        generation,
        messaging,
        config: config.clone(),
        is_production,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
