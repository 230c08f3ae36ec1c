use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::fairness::InclusiveLanguageDetector;
use crate::matching::providers::AnthropicProvider;
use crate::matching::similarity::LexicalSimilarity;
use crate::matching::taxonomy::StaticSkillTaxonomy;
use crate::matching::weights::ScoringWeights;
use crate::matching::{HybridMatcher, LlmGateway, LlmProvider, MlScorer};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless; one instance serves every request.
    pub matcher: Arc<HybridMatcher>,
    pub config: Config,
}

impl AppState {
    pub fn new(matcher: HybridMatcher, config: Config) -> Self {
        Self {
            matcher: Arc::new(matcher),
            config,
        }
    }

    /// Wires the default collaborators and the configured provider cascade.
    pub fn from_config(config: Config) -> Result<Self> {
        let gateway = LlmGateway::new(build_providers(&config)?);
        info!(providers = ?gateway.provider_names(), "LLM gateway initialized");

        let ml = MlScorer::new(Arc::new(StaticSkillTaxonomy), Arc::new(LexicalSimilarity));
        let mut matcher =
            HybridMatcher::new(ml, gateway, ScoringWeights::preset(config.scoring_preset));
        if config.fairness_enabled {
            matcher = matcher.with_bias_detector(Arc::new(InclusiveLanguageDetector));
        }
        info!(
            preset = ?config.scoring_preset,
            fairness = config.fairness_enabled,
            "Hybrid matcher initialized"
        );

        Ok(Self::new(matcher, config))
    }
}

fn build_providers(config: &Config) -> Result<Vec<Arc<dyn LlmProvider>>> {
    let mut providers: Vec<Arc<dyn LlmProvider>> = Vec::new();

    for name in &config.llm_providers {
        match name.as_str() {
            AnthropicProvider::NAME => {
                let client = LlmClient::new(
                    config.anthropic_api_key.clone(),
                    config.anthropic_model.clone(),
                )?;
                let provider = AnthropicProvider::new(client);
                if !provider.is_available() {
                    warn!("ANTHROPIC_API_KEY is not set; anthropic provider will report unavailable");
                }
                providers.push(Arc::new(provider));
            }
            other => warn!(provider = other, "Unknown LLM provider in LLM_PROVIDERS; skipping"),
        }
    }

    Ok(providers)
}
