//! Report generation pipeline
//!
//! One invocation = one report: normalize the payload, build the prompt,
//! make the single vision call, sanitize the result. Fails fast at the
//! first violated precondition; nothing is persisted from a failed run.

pub mod normalize;
pub mod openai;
pub mod prompt;
pub mod sanitize;

use std::sync::Arc;
use std::time::Duration;

use adscribe_core::{AppError, Config};
use async_trait::async_trait;

use normalize::{normalize_payload, ClientContext, ScreenshotInput, TabularAttachment};
use openai::OpenAiService;
use sanitize::sanitize;

/// Seam to the vision-capable text-generation collaborator. One call per
/// report; implementations own their transport, timeout, and wire format.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate_report(
        &self,
        system_prompt: &str,
        image_data_uris: &[String],
        user_prompt: &str,
    ) -> Result<String, AppError>;
}

/// Everything one generation request carries.
#[derive(Debug)]
pub struct GenerateReportInput {
    pub screenshots: Vec<ScreenshotInput>,
    pub client: Option<ClientContext>,
    pub notes: Option<String>,
    pub tabular: Option<TabularAttachment>,
}

/// Orchestrates the screenshot-to-report pipeline.
///
/// Holds the generation provider when a credential is configured; without
/// one, every request fails with a configuration error before any
/// normalization or network activity.
#[derive(Clone)]
pub struct ReportGenerator {
    provider: Option<Arc<dyn GenerationProvider>>,
    max_images: usize,
}

impl ReportGenerator {
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let provider: Option<Arc<dyn GenerationProvider>> = match config.openai_api_key() {
            Some(api_key) => Some(Arc::new(OpenAiService::new(
                api_key.to_string(),
                config.openai_api_base().to_string(),
                config.openai_model().to_string(),
                config.generation_max_tokens(),
                Duration::from_secs(config.generation_timeout_seconds()),
            )?)),
            None => None,
        };

        Ok(Self {
            provider,
            max_images: config.max_screenshots(),
        })
    }

    pub fn with_provider(provider: Arc<dyn GenerationProvider>, max_images: usize) -> Self {
        Self {
            provider: Some(provider),
            max_images,
        }
    }

    /// Generate one sanitized report text from the given input.
    #[tracing::instrument(skip(self, input), fields(screenshot_count = input.screenshots.len()))]
    pub async fn generate(&self, input: GenerateReportInput) -> Result<String, AppError> {
        // Credential check comes first: a misconfigured deployment must be
        // distinguishable from a bad request.
        let provider = self.provider.as_ref().ok_or_else(|| {
            AppError::Configuration("OPENAI_API_KEY not configured".to_string())
        })?;

        let payload = normalize_payload(
            &input.screenshots,
            input.client.as_ref(),
            input.notes.as_deref(),
            input.tabular.as_ref(),
            self.max_images,
        )?;

        tracing::info!(
            image_count = payload.image_count(),
            has_tabular = input.tabular.is_some(),
            "Sending generation request"
        );

        let user_prompt = prompt::build_user_prompt(
            &payload.context_block,
            payload.image_count(),
            input.tabular.is_some(),
        );

        let raw = provider
            .generate_report(prompt::SYSTEM_PROMPT, &payload.images, &user_prompt)
            .await?;
        let report = sanitize(&raw);

        if report.trim().is_empty() {
            return Err(AppError::Transport(
                "Generation service returned an empty report".to_string(),
            ));
        }

        tracing::info!(report_length = report.len(), "Report generated");
        Ok(report)
    }
}
