//! Gemini configuration loaded from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Connection settings for the Gemini completion service.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl GeminiConfig {
    /// Load from environment variables: GEMINI_API_KEY (required),
    /// GEMINI_BASE_URL and GEMINI_MODEL (optional, with defaults).
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY not set")?;
        let base_url = env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| gemini_client::DEFAULT_BASE_URL.to_string());
        let model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| gemini_client::DEFAULT_MODEL.to_string());
        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }
}
