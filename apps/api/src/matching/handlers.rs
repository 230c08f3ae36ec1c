use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::matching::blender::elapsed_ms;
use crate::matching::models::{HybridMatchResult, JobProfile, ResumeProfile};
use crate::matching::weights::{RawWeights, ScoringWeights, WeightPreset};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume: ResumeProfile,
    pub job: JobProfile,
    /// Validated in the handler so a bad sum is a 400, not an extractor rejection.
    #[serde(default)]
    pub weights: Option<RawWeights>,
    #[serde(default)]
    pub resume_full_text: Option<String>,
    #[serde(default)]
    pub job_full_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PresetsResponse {
    pub default: WeightPreset,
    pub general: ScoringWeights,
    pub hybrid: ScoringWeights,
}

/// POST /api/v1/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<HybridMatchResult>, AppError> {
    if req.job.skills.is_empty() && req.job.experience.trim().is_empty() {
        return Err(AppError::Validation(
            "job must list at least one skill or an experience requirement".to_string(),
        ));
    }
    let weights = req.weights.map(ScoringWeights::new).transpose()?;

    let started = Instant::now();
    let analysis = state.matcher.analyze_match(
        &req.resume,
        &req.job,
        weights,
        req.resume_full_text.as_deref(),
        req.job_full_text.as_deref(),
    );

    let result = match tokio::time::timeout(state.config.analysis_timeout, analysis).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                timeout_secs = state.config.analysis_timeout.as_secs(),
                "Match analysis timed out; returning neutral result"
            );
            let mut result = state.matcher.fallback_result(&req.job, weights);
            result.processing_time_ms = elapsed_ms(started);
            result
        }
    };

    Ok(Json(result))
}

/// POST /api/v1/weights/normalize
pub async fn handle_normalize_weights(
    Json(raw): Json<RawWeights>,
) -> Result<Json<ScoringWeights>, AppError> {
    Ok(Json(ScoringWeights::normalized(raw)?))
}

/// GET /api/v1/weights/presets
pub async fn handle_weight_presets(State(state): State<AppState>) -> Json<PresetsResponse> {
    Json(PresetsResponse {
        default: state.config.scoring_preset,
        general: ScoringWeights::general(),
        hybrid: ScoringWeights::hybrid(),
    })
}
