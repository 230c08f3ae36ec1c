//! Data model shared by the scorers, the LLM gateway and the hybrid blender.
//!
//! All of these are built fresh per analysis request and handed back to the
//! caller; nothing here is retained between calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::fairness::FairnessReport;
use crate::matching::weights::ScoringWeights;

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// Candidate data produced by upstream resume analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub full_text: Option<String>,
}

/// Job requirements produced by upstream job-description analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobProfile {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub full_text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// ML path
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Related,
    Semantic,
    None,
}

/// One row of the skill breakdown: a required job skill, or a bonus resume skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchEntry {
    pub skill: String,
    pub required: bool,
    pub matched: bool,
    pub match_type: MatchType,
    pub score: u32, // 0 – 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Per-dimension sub-scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionScores {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub semantic: f64,
}

impl DimensionScores {
    pub fn uniform(value: f64) -> Self {
        let value = value.clamp(0.0, 100.0);
        Self {
            skills: value,
            experience: value,
            education: value,
            semantic: value,
        }
    }

    /// Returns a copy with every dimension clamped into [0, 100].
    pub fn clamped(self) -> Self {
        Self {
            skills: self.skills.clamp(0.0, 100.0),
            experience: self.experience.clamp(0.0, 100.0),
            education: self.education.clamp(0.0, 100.0),
            semantic: self.semantic.clamp(0.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Output of the deterministic multi-dimensional scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlAnalysisResult {
    pub total_score: f64,
    pub dimension_scores: DimensionScores,
    /// How much supporting data was available, in [0.1, 1.0].
    pub confidence: f64,
    pub explanation: Explanation,
    pub skill_breakdown: Vec<SkillMatchEntry>,
}

impl MlAnalysisResult {
    /// Required job skills that matched, in job order.
    pub fn matched_skills(&self) -> Vec<String> {
        self.skill_breakdown
            .iter()
            .filter(|e| e.required && e.matched)
            .map(|e| e.skill.clone())
            .collect()
    }

    /// Required job skills with no match of any kind.
    pub fn missing_skills(&self) -> Vec<String> {
        self.skill_breakdown
            .iter()
            .filter(|e| e.required && !e.matched)
            .map(|e| e.skill.clone())
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LLM path
// ────────────────────────────────────────────────────────────────────────────

/// Provider-independent qualitative judgment, normalized by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmAnalysisResult {
    pub match_percentage: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub candidate_strengths: Vec<String>,
    pub candidate_weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Final output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Level from a 0–100 match percentage: >80 high, >60 medium, else low.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 80.0 {
            ConfidenceLevel::High
        } else if percentage > 60.0 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    /// Level from an ML confidence in [0, 1]: >0.8 high, >0.5 medium, else low.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.8 {
            ConfidenceLevel::High
        } else if confidence > 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMethod {
    Hybrid,
    MlOnly,
    LlmOnly,
    /// Neutral result returned when no analysis path could run.
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridMatchResult {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub match_percentage: u8, // 0 – 100
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub candidate_strengths: Vec<String>,
    pub candidate_weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence_level: ConfidenceLevel,
    pub confidence: f64, // 0.0 – 1.0
    pub scoring_dimensions: DimensionScores,
    /// True when `scoring_dimensions` are placeholders rather than measured
    /// sub-scores (llm_only split and the neutral fallback). Display only.
    pub estimated_dimensions: bool,
    pub analysis_method: AnalysisMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skill_breakdown: Vec<SkillMatchEntry>,
    pub weights_used: ScoringWeights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fairness_metrics: Option<FairnessReport>,
    pub processing_time_ms: u64,
}
