//! Configuration module
//!
//! Environment-driven configuration for the API and services: server,
//! database, generation service, and messaging delivery settings.

use std::env;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 4000;
const GENERATION_TIMEOUT_SECS: u64 = 60;
const GENERATION_MAX_TOKENS: u32 = 4000;
const MAX_SCREENSHOTS: usize = 5;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    cors_origins: Vec<String>,
    environment: String,
    database_url: String,
    db_max_connections: u32,
    db_timeout_seconds: u64,
    // Generation service (OpenAI chat completions, vision)
    openai_api_key: Option<String>,
    openai_api_base: String,
    openai_model: String,
    generation_timeout_seconds: u64,
    generation_max_tokens: u32,
    max_screenshots: usize,
    // LINE messaging delivery
    line_channel_access_token: Option<String>,
    line_api_base: String,
    // Base URL used when building public report links
    public_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        // The report frontend is served from arbitrary origins; the delivery
        // contract keeps CORS open unless the operator narrows it.
        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let config = Config {
            server_port,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            generation_timeout_seconds: env::var("GENERATION_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| GENERATION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(GENERATION_TIMEOUT_SECS),
            generation_max_tokens: env::var("GENERATION_MAX_TOKENS")
                .unwrap_or_else(|_| GENERATION_MAX_TOKENS.to_string())
                .parse()
                .unwrap_or(GENERATION_MAX_TOKENS),
            max_screenshots: env::var("MAX_SCREENSHOTS")
                .unwrap_or_else(|_| MAX_SCREENSHOTS.to_string())
                .parse()
                .unwrap_or(MAX_SCREENSHOTS),
            line_channel_access_token: env::var("LINE_CHANNEL_ACCESS_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            line_api_base: env::var("LINE_API_BASE")
                .unwrap_or_else(|_| "https://api.line.me".to_string()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.generation_timeout_seconds == 0 {
            return Err(anyhow::anyhow!(
                "GENERATION_TIMEOUT_SECONDS must be greater than zero"
            ));
        }

        if self.max_screenshots == 0 {
            return Err(anyhow::anyhow!("MAX_SCREENSHOTS must be greater than zero"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.db_timeout_seconds
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref()
    }

    pub fn openai_api_base(&self) -> &str {
        &self.openai_api_base
    }

    pub fn openai_model(&self) -> &str {
        &self.openai_model
    }

    pub fn generation_timeout_seconds(&self) -> u64 {
        self.generation_timeout_seconds
    }

    pub fn generation_max_tokens(&self) -> u32 {
        self.generation_max_tokens
    }

    pub fn max_screenshots(&self) -> usize {
        self.max_screenshots
    }

    pub fn line_channel_access_token(&self) -> Option<&str> {
        self.line_channel_access_token.as_deref()
    }

    pub fn line_api_base(&self) -> &str {
        &self.line_api_base
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            database_url: "postgresql://localhost/adscribe".to_string(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            openai_api_key: Some("sk-test".to_string()),
            openai_api_base: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            generation_timeout_seconds: GENERATION_TIMEOUT_SECS,
            generation_max_tokens: GENERATION_MAX_TOKENS,
            max_screenshots: MAX_SCREENSHOTS,
            line_channel_access_token: None,
            line_api_base: "https://api.line.me".to_string(),
            public_base_url: "http://localhost:4000".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_postgres_url() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_postgres_url() {
        let mut config = base_config();
        config.database_url = "mysql://localhost/adscribe".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = base_config();
        config.generation_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut config = base_config();
        assert!(!config.is_production());
        config.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
