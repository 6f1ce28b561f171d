//! Domain models shared across Adscribe components.

mod client;
mod report;

pub use client::{Client, ClientResponse, CreateClientRequest, UpdateClientRequest};
pub use report::{
    Report, ReportResponse, ReportStatus, ReportSummary, UpdateReportRequest,
};
