//! Application state and sub-state extractors.
//!
//! AppState is split into domain sub-states so handlers can extract only
//! what they need via Axum's `FromRef`.

use adscribe_core::Config;
use adscribe_db::{ClientRepository, ReportRepository};
use adscribe_services::{LineMessagingService, ReportGenerator};
use sqlx::PgPool;
use std::sync::Arc;

/// Database pool and repositories.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub clients: ClientRepository,
    pub reports: ReportRepository,
}

/// Report generation pipeline.
#[derive(Clone)]
pub struct GenerationState {
    pub generator: ReportGenerator,
}

/// Outbound messaging delivery.
#[derive(Clone)]
pub struct MessagingState {
    pub line: LineMessagingService,
}

/// Main application state: aggregates sub-states for dependency injection.
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub generation: GenerationState,
    pub messaging: MessagingState,
    pub config: Config,
    pub is_production: bool,
}

impl axum::extract::FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for GenerationState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.generation.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for MessagingState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.messaging.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
