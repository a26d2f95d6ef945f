use std::env;

use crate::error::{PlannerError, Result};

/// Model used when `MODEL_NAME` is not set.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Application configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base: Option<String>,
    pub model_name: String,
    pub debug_mode: bool,
}

impl AppConfig {
    /// Load configuration from environment variables, reading a `.env`
    /// file first if one is present. A missing API key is a hard failure.
    pub fn load() -> Result<Self> {
        Self::load_with(None)
    }

    /// Same as [`AppConfig::load`], but lets the caller supply the
    /// credential directly (a CLI flag wins over `OPENAI_API_KEY`).
    pub fn load_with(api_key_override: Option<String>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = api_key_override
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                PlannerError::Config(
                    "OPENAI_API_KEY environment variable must be set before starting".to_string(),
                )
            })?;

        Ok(Self {
            api_key,
            api_base: env::var("OPENAI_API_BASE")
                .ok()
                .filter(|url| !url.is_empty()),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            debug_mode: env::var("DEBUG_MODE")
                .map(|value| value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        })
    }
}
