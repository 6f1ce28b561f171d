//! HTTP handlers

pub mod clients;
pub mod distribute;
pub mod generate;
pub mod health;
pub mod public_report;
pub mod reports;
