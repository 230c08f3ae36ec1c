//! LLM Analysis Gateway: ordered provider cascade plus result normalization.
//!
//! The cascade is driven by `is_available()` capability checks only. Once a
//! provider is chosen its failure is returned to the caller as
//! `MatchError::Provider`; the gateway never retries on another provider
//! mid-call.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::llm_client::LlmError;
use crate::matching::error::MatchError;
use crate::matching::models::{JobProfile, LlmAnalysisResult, ResumeProfile};

/// Provider output before normalization. Field naming varies by provider.
pub type ProviderRawResult = Value;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Cheap capability check (credentials present, feature enabled).
    /// Must not make network calls.
    fn is_available(&self) -> bool;

    async fn analyze_match(
        &self,
        resume: &ResumeProfile,
        job: &JobProfile,
        resume_full_text: Option<&str>,
        job_full_text: Option<&str>,
    ) -> Result<ProviderRawResult, LlmError>;
}

const PERCENTAGE_KEYS: &[&str] = &[
    "match_percentage",
    "matchPercentage",
    "match_score",
    "matchScore",
    "overall_score",
    "overallScore",
    "score",
];
const MATCHED_KEYS: &[&str] = &["matched_skills", "matchedSkills", "skills_matched", "skillsMatched"];
const MISSING_KEYS: &[&str] = &[
    "missing_skills",
    "missingSkills",
    "skill_gaps",
    "skillGaps",
    "gaps_in_skills",
];
const STRENGTH_KEYS: &[&str] = &["candidate_strengths", "candidateStrengths", "strengths"];
const WEAKNESS_KEYS: &[&str] = &[
    "candidate_weaknesses",
    "candidateWeaknesses",
    "weaknesses",
    "gaps",
];
const RECOMMENDATION_KEYS: &[&str] = &["recommendations", "suggestions", "improvement_suggestions"];

/// Ordered list of providers, most preferred first.
#[derive(Clone, Default)]
pub struct LlmGateway {
    providers: Vec<Arc<dyn LlmProvider>>,
}

impl LlmGateway {
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// First provider reporting itself available, in preference order.
    pub fn select_provider(&self) -> Option<Arc<dyn LlmProvider>> {
        let selected = self.providers.iter().find(|p| p.is_available()).cloned();
        match &selected {
            Some(p) => debug!(provider = p.name(), "Selected LLM provider"),
            None => debug!(
                configured = self.providers.len(),
                "No LLM provider available"
            ),
        }
        selected
    }

    /// Runs the analysis on `provider` and normalizes its output.
    pub async fn analyze(
        &self,
        provider: &dyn LlmProvider,
        resume: &ResumeProfile,
        job: &JobProfile,
        resume_full_text: Option<&str>,
        job_full_text: Option<&str>,
    ) -> Result<LlmAnalysisResult, MatchError> {
        let raw = provider
            .analyze_match(resume, job, resume_full_text, job_full_text)
            .await
            .map_err(|source| MatchError::Provider {
                provider: provider.name().to_string(),
                source,
            })?;

        let result = normalize_raw_result(&raw)?;
        info!(
            provider = provider.name(),
            match_percentage = result.match_percentage,
            "LLM analysis complete"
        );
        Ok(result)
    }
}

/// Maps provider-specific field naming onto `LlmAnalysisResult`.
///
/// The percentage is required and clamped to [0, 100]; list fields default
/// to empty.
pub fn normalize_raw_result(raw: &Value) -> Result<LlmAnalysisResult, MatchError> {
    let obj = raw.as_object().ok_or_else(|| {
        MatchError::MalformedProviderResult("expected a JSON object".to_string())
    })?;

    let match_percentage = PERCENTAGE_KEYS
        .iter()
        .find_map(|k| obj.get(*k).and_then(as_number))
        .ok_or_else(|| {
            MatchError::MalformedProviderResult("no match percentage field".to_string())
        })?
        .clamp(0.0, 100.0);

    let list = |keys: &[&str]| -> Vec<String> {
        keys.iter()
            .find_map(|k| obj.get(*k))
            .map(as_string_list)
            .unwrap_or_default()
    };

    Ok(LlmAnalysisResult {
        match_percentage,
        matched_skills: list(MATCHED_KEYS),
        missing_skills: list(MISSING_KEYS),
        candidate_strengths: list(STRENGTH_KEYS),
        candidate_weaknesses: list(WEAKNESS_KEYS),
        recommendations: list(RECOMMENDATION_KEYS),
    })
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
    .filter(|n: &f64| n.is_finite())
}

/// Accepts arrays of strings, arrays of `{skill|name|text: ..}` objects, or a
/// single comma-separated string.
fn as_string_list(value: &Value) -> Vec<String> {
    let items: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(o) => ["skill", "name", "text", "description"]
                    .iter()
                    .find_map(|k| o.get(*k).and_then(Value::as_str))
                    .map(str::to_string),
                _ => None,
            })
            .collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
