use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::matching::weights::WeightPreset;

/// Application configuration loaded from environment variables.
/// Everything has a default; an LLM key is optional and its absence only
/// makes the provider report itself unavailable.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub anthropic_api_key: String,
    pub anthropic_model: String,
    /// Provider preference order, most preferred first.
    pub llm_providers: Vec<String>,
    pub scoring_preset: WeightPreset,
    /// Caller-side deadline around one match analysis.
    pub analysis_timeout: Duration,
    pub fairness_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            anthropic_api_key: var("ANTHROPIC_API_KEY").unwrap_or_default(),
            anthropic_model: var("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_providers: var("LLM_PROVIDERS")
                .unwrap_or_else(|| "anthropic".to_string())
                .split(',')
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
            scoring_preset: var("SCORING_PRESET")
                .unwrap_or_else(|| "hybrid".to_string())
                .parse::<WeightPreset>()
                .context("SCORING_PRESET must be 'hybrid' or 'general'")?,
            analysis_timeout: Duration::from_secs(
                var("ANALYSIS_TIMEOUT_SECS")
                    .unwrap_or_else(|| "60".to_string())
                    .parse::<u64>()
                    .context("ANALYSIS_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            fairness_enabled: var("FAIRNESS_ENABLED")
                .map(|v| parse_bool(&v))
                .transpose()
                .context("FAIRNESS_ENABLED must be true or false")?
                .unwrap_or(true),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            anthropic_api_key: String::new(),
            anthropic_model: DEFAULT_MODEL.to_string(),
            llm_providers: vec!["anthropic".to_string()],
            scoring_preset: WeightPreset::Hybrid,
            analysis_timeout: Duration::from_secs(60),
            fairness_enabled: true,
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("invalid boolean '{other}'"),
    }
}
