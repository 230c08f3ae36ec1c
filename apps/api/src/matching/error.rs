use thiserror::Error;

use crate::llm_client::LlmError;

/// Failures inside the matching core.
///
/// None of these reach the caller of `HybridMatcher::analyze_match`; the
/// blender converts them into a degraded result.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid scoring weights: {0}")]
    InvalidWeights(String),

    #[error("Semantic similarity failed: {0}")]
    Similarity(String),

    #[error("LLM provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: LlmError,
    },

    #[error("No LLM provider is available")]
    NoProviderAvailable,

    #[error("Malformed provider result: {0}")]
    MalformedProviderResult(String),

    #[error("Fairness enrichment failed: {0}")]
    Fairness(String),
}
