//! Adscribe HTTP API
//!
//! Axum service exposing report generation, report lifecycle management,
//! client CRUD, LINE distribution, and the public report view.

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
