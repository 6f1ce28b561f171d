//! Adscribe database layer
//!
//! sqlx/Postgres repositories for clients and reports. Keyed reads, inserts,
//! updates, and deletes only; no transaction spans multiple records.

mod client;
mod report;

pub use client::ClientRepository;
pub use report::ReportRepository;
