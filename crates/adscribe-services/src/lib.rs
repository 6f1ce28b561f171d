//! Adscribe services
//!
//! External collaborators and the report generation pipeline: payload
//! normalization, prompt construction, the OpenAI vision call, response
//! sanitization, and LINE message delivery.

pub mod generation;
mod line;

pub use generation::{
    normalize::{ClientContext, NormalizedPayload, ScreenshotInput, TabularAttachment},
    sanitize::sanitize,
    GenerateReportInput, GenerationProvider, ReportGenerator,
};
pub use line::{build_report_message, LineMessagingService};
