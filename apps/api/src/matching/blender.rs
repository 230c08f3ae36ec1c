//! Hybrid Blender: picks an analysis strategy once per call, runs it, and
//! folds ML and LLM judgments into a single `HybridMatchResult`.
//!
//! `analyze_match` never fails. Provider failures degrade to `ml_only`; any
//! other failure degrades to the neutral fallback result.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::matching::aggregator::MlScorer;
use crate::matching::error::MatchError;
use crate::matching::fairness::{BiasDetector, FairnessContext};
use crate::matching::gateway::{LlmGateway, LlmProvider};
use crate::matching::models::{
    AnalysisMethod, ConfidenceLevel, DimensionScores, HybridMatchResult, JobProfile,
    LlmAnalysisResult, MlAnalysisResult, ResumeProfile,
};
use crate::matching::weights::ScoringWeights;

/// Fixed split of an LLM percentage into display-only dimension estimates.
const LLM_ONLY_SPLIT: DimensionScores = DimensionScores {
    skills: 0.6,
    experience: 0.3,
    education: 0.1,
    semantic: 0.1,
};

const FALLBACK_PERCENTAGE: u8 = 50;
const FALLBACK_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Hybrid,
    MlOnly,
    LlmOnly,
    Fallback,
}

/// Strategy for a call, from whether both full texts are present and whether
/// any provider reports itself available.
pub fn select_strategy(has_full_text: bool, provider_available: bool) -> Strategy {
    match (has_full_text, provider_available) {
        (true, true) => Strategy::Hybrid,
        (true, false) => Strategy::MlOnly,
        (false, true) => Strategy::LlmOnly,
        (false, false) => Strategy::Fallback,
    }
}

/// Stateless orchestrator. Collaborators are injected; nothing is retained
/// between calls, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct HybridMatcher {
    ml: MlScorer,
    gateway: LlmGateway,
    bias_detector: Option<Arc<dyn BiasDetector>>,
    default_weights: ScoringWeights,
}

impl HybridMatcher {
    pub fn new(ml: MlScorer, gateway: LlmGateway, default_weights: ScoringWeights) -> Self {
        Self {
            ml,
            gateway,
            bias_detector: None,
            default_weights,
        }
    }

    pub fn with_bias_detector(mut self, detector: Arc<dyn BiasDetector>) -> Self {
        self.bias_detector = Some(detector);
        self
    }

    pub fn default_weights(&self) -> ScoringWeights {
        self.default_weights
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.gateway.provider_names()
    }

    pub async fn analyze_match(
        &self,
        resume: &ResumeProfile,
        job: &JobProfile,
        weights: Option<ScoringWeights>,
        resume_full_text: Option<&str>,
        job_full_text: Option<&str>,
    ) -> HybridMatchResult {
        let started = Instant::now();
        let weights = weights.unwrap_or(self.default_weights);

        let resume_text = present(resume_full_text.or(resume.full_text.as_deref()));
        let job_text = present(job_full_text.or(job.full_text.as_deref()));
        let texts = resume_text.zip(job_text);

        let provider = self.gateway.select_provider();
        let strategy = select_strategy(texts.is_some(), provider.is_some());
        info!(
            ?strategy,
            provider = provider.as_ref().map(|p| p.name()).unwrap_or("none"),
            job_skills = job.skills.len(),
            "Starting match analysis"
        );

        let outcome = match (strategy, provider, texts) {
            (Strategy::Hybrid, Some(provider), Some((resume_text, job_text))) => {
                self.run_hybrid(provider.as_ref(), resume, job, resume_text, job_text, weights)
                    .await
            }
            (Strategy::MlOnly, _, Some((resume_text, job_text))) => {
                self.run_ml_only(resume, job, resume_text, job_text, weights)
                    .await
            }
            (Strategy::LlmOnly, Some(provider), _) => {
                self.run_llm_only(provider.as_ref(), resume, job, weights)
                    .await
            }
            (Strategy::Fallback, _, _) => {
                info!("No full text and no LLM provider; returning neutral result");
                Ok(neutral_result(job, weights))
            }
            _ => Err(MatchError::NoProviderAvailable),
        };

        let mut result = outcome.unwrap_or_else(|e| {
            error!(error = %e, ?strategy, "Match analysis failed; returning neutral result");
            neutral_result(job, weights)
        });

        if let Some((resume_text, job_text)) = texts {
            self.attach_fairness(&mut result, resume, job, resume_text, job_text)
                .await;
        }

        result.processing_time_ms = elapsed_ms(started);
        info!(
            method = ?result.analysis_method,
            match_percentage = result.match_percentage,
            confidence = result.confidence,
            processing_time_ms = result.processing_time_ms,
            "Match analysis complete"
        );
        result
    }

    /// Neutral result for callers whose own deadline elapsed.
    pub fn fallback_result(
        &self,
        job: &JobProfile,
        weights: Option<ScoringWeights>,
    ) -> HybridMatchResult {
        neutral_result(job, weights.unwrap_or(self.default_weights))
    }

    async fn run_hybrid(
        &self,
        provider: &dyn LlmProvider,
        resume: &ResumeProfile,
        job: &JobProfile,
        resume_text: &str,
        job_text: &str,
        weights: ScoringWeights,
    ) -> Result<HybridMatchResult, MatchError> {
        // Both paths always run to completion; a finished ML result is reused
        // for ml_only when the LLM side fails.
        let (ml, llm) = tokio::join!(
            self.ml
                .analyze(resume, job, Some(resume_text), Some(job_text), &weights),
            self.gateway
                .analyze(provider, resume, job, Some(resume_text), Some(job_text)),
        );

        let ml = ml?;
        match llm {
            Ok(llm) => {
                debug!(
                    ml_score = ml.total_score,
                    ml_confidence = ml.confidence,
                    llm_score = llm.match_percentage,
                    "Blending ML and LLM results"
                );
                Ok(blend(&ml, &llm, provider.name(), weights))
            }
            Err(e) => {
                warn!(error = %e, "LLM analysis failed; degrading to ml_only");
                Ok(ml_only_result(ml, weights))
            }
        }
    }

    async fn run_ml_only(
        &self,
        resume: &ResumeProfile,
        job: &JobProfile,
        resume_text: &str,
        job_text: &str,
        weights: ScoringWeights,
    ) -> Result<HybridMatchResult, MatchError> {
        let ml = self
            .ml
            .analyze(resume, job, Some(resume_text), Some(job_text), &weights)
            .await?;
        Ok(ml_only_result(ml, weights))
    }

    async fn run_llm_only(
        &self,
        provider: &dyn LlmProvider,
        resume: &ResumeProfile,
        job: &JobProfile,
        weights: ScoringWeights,
    ) -> Result<HybridMatchResult, MatchError> {
        let llm = self
            .gateway
            .analyze(provider, resume, job, None, None)
            .await?;
        Ok(llm_only_result(llm, provider.name(), weights))
    }

    async fn attach_fairness(
        &self,
        result: &mut HybridMatchResult,
        resume: &ResumeProfile,
        job: &JobProfile,
        resume_text: &str,
        job_text: &str,
    ) {
        let Some(detector) = &self.bias_detector else {
            return;
        };

        let dimensions = result.scoring_dimensions;
        let ctx = FairnessContext {
            candidate: resume,
            job,
            resume_text,
            job_text,
            match_percentage: result.match_percentage,
            dimensions: &dimensions,
        };

        match detector.detect_bias(&ctx).await {
            Ok(report) => {
                debug!(
                    bias_score = report.bias_score,
                    flags = report.flags.len(),
                    "Fairness enrichment attached"
                );
                result.fairness_metrics = Some(report);
            }
            Err(e) => warn!(
                error = %e,
                "Fairness enrichment failed; returning result without fairness data"
            ),
        }
    }
}

/// Confidence-weighted blend of the ML and LLM results.
pub fn blend(
    ml: &MlAnalysisResult,
    llm: &LlmAnalysisResult,
    provider: &str,
    weights: ScoringWeights,
) -> HybridMatchResult {
    let ml_weight = ml.confidence.clamp(0.0, 1.0);
    let llm_weight = 1.0 - ml_weight;
    let match_percentage =
        to_percentage(ml.total_score * ml_weight + llm.match_percentage * llm_weight);

    HybridMatchResult {
        match_percentage,
        matched_skills: union(&ml.matched_skills(), &llm.matched_skills),
        missing_skills: union(&ml.missing_skills(), &llm.missing_skills),
        candidate_strengths: union(&ml.explanation.strengths, &llm.candidate_strengths),
        candidate_weaknesses: union(&ml.explanation.weaknesses, &llm.candidate_weaknesses),
        recommendations: union(&ml.explanation.recommendations, &llm.recommendations),
        confidence_level: ConfidenceLevel::from_percentage(f64::from(match_percentage)),
        confidence: ((ml_weight + llm.match_percentage / 100.0) / 2.0).clamp(0.0, 1.0),
        scoring_dimensions: ml.dimension_scores,
        llm_provider: Some(provider.to_string()),
        skill_breakdown: ml.skill_breakdown.clone(),
        ..blank(AnalysisMethod::Hybrid, weights)
    }
}

pub fn ml_only_result(ml: MlAnalysisResult, weights: ScoringWeights) -> HybridMatchResult {
    let confidence = ml.confidence.clamp(0.0, 1.0);
    HybridMatchResult {
        match_percentage: to_percentage(ml.total_score),
        matched_skills: ml.matched_skills(),
        missing_skills: ml.missing_skills(),
        candidate_strengths: ml.explanation.strengths,
        candidate_weaknesses: ml.explanation.weaknesses,
        recommendations: ml.explanation.recommendations,
        confidence_level: ConfidenceLevel::from_confidence(confidence),
        confidence,
        scoring_dimensions: ml.dimension_scores,
        skill_breakdown: ml.skill_breakdown,
        ..blank(AnalysisMethod::MlOnly, weights)
    }
}

/// LLM result used directly. Dimension scores are estimates split from the
/// single percentage and are flagged as such.
pub fn llm_only_result(
    llm: LlmAnalysisResult,
    provider: &str,
    weights: ScoringWeights,
) -> HybridMatchResult {
    let p = llm.match_percentage.clamp(0.0, 100.0);
    let scoring_dimensions = DimensionScores {
        skills: (p * LLM_ONLY_SPLIT.skills).round(),
        experience: (p * LLM_ONLY_SPLIT.experience).round(),
        education: (p * LLM_ONLY_SPLIT.education).round(),
        semantic: (p * LLM_ONLY_SPLIT.semantic).round(),
    };

    HybridMatchResult {
        match_percentage: to_percentage(p),
        matched_skills: llm.matched_skills,
        missing_skills: llm.missing_skills,
        candidate_strengths: llm.candidate_strengths,
        candidate_weaknesses: llm.candidate_weaknesses,
        recommendations: llm.recommendations,
        confidence_level: ConfidenceLevel::from_percentage(p),
        confidence: p / 100.0,
        scoring_dimensions,
        estimated_dimensions: true,
        llm_provider: Some(provider.to_string()),
        ..blank(AnalysisMethod::LlmOnly, weights)
    }
}

/// Fixed neutral result: 50 everywhere, low confidence, every job skill missing.
pub fn neutral_result(job: &JobProfile, weights: ScoringWeights) -> HybridMatchResult {
    HybridMatchResult {
        match_percentage: FALLBACK_PERCENTAGE,
        missing_skills: job.skills.clone(),
        candidate_strengths: vec![
            "Candidate profile received; detailed analysis was unavailable".to_string(),
        ],
        candidate_weaknesses: vec![
            "Match quality could not be assessed automatically".to_string(),
        ],
        recommendations: vec![
            "Provide full resume and job description text, or retry when an analysis provider is available"
                .to_string(),
        ],
        confidence_level: ConfidenceLevel::Low,
        confidence: FALLBACK_CONFIDENCE,
        scoring_dimensions: DimensionScores::uniform(f64::from(FALLBACK_PERCENTAGE)),
        estimated_dimensions: true,
        ..blank(AnalysisMethod::Fallback, weights)
    }
}

fn blank(method: AnalysisMethod, weights: ScoringWeights) -> HybridMatchResult {
    HybridMatchResult {
        analysis_id: Uuid::new_v4(),
        analyzed_at: Utc::now(),
        match_percentage: 0,
        matched_skills: Vec::new(),
        missing_skills: Vec::new(),
        candidate_strengths: Vec::new(),
        candidate_weaknesses: Vec::new(),
        recommendations: Vec::new(),
        confidence_level: ConfidenceLevel::Low,
        confidence: 0.0,
        scoring_dimensions: DimensionScores::default(),
        estimated_dimensions: false,
        analysis_method: method,
        llm_provider: None,
        skill_breakdown: Vec::new(),
        weights_used: weights,
        fairness_metrics: None,
        processing_time_ms: 0,
    }
}

/// Order-preserving union with exact-string deduplication.
fn union(first: &[String], second: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(first.len() + second.len());
    for item in first.iter().chain(second) {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

fn to_percentage(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn present(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use crate::llm_client::LlmError;
    use crate::matching::fairness::{FairnessReport, InclusiveLanguageDetector};
    use crate::matching::gateway::ProviderRawResult;
    use crate::matching::models::{Explanation, MatchType, SkillMatchEntry};
    use crate::matching::similarity::{LexicalSimilarity, SemanticSimilarity};
    use crate::matching::taxonomy::StaticSkillTaxonomy;

    const RESUME_TEXT: &str =
        "Frontend engineer building React and Node.js services. 5 years of experience.";
    const JOB_TEXT: &str =
        "Hiring a React and Node.js engineer, Docker a plus. 5+ years of experience.";

    struct StubProvider {
        percentage: f64,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn ok(percentage: f64) -> Arc<Self> {
            Arc::new(Self {
                percentage,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                percentage: 0.0,
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn analyze_match(
            &self,
            _resume: &ResumeProfile,
            _job: &JobProfile,
            _resume_full_text: Option<&str>,
            _job_full_text: Option<&str>,
        ) -> Result<ProviderRawResult, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LlmError::Api {
                    status: 500,
                    message: "upstream unavailable".to_string(),
                });
            }
            Ok(json!({
                "match_percentage": self.percentage,
                "matched_skills": ["React", "NodeJS"],
                "missing_skills": ["Docker"],
                "candidate_strengths": ["Strong frontend background"],
                "candidate_weaknesses": ["No container experience"],
                "recommendations": ["Add a Docker project"]
            }))
        }
    }

    struct BrokenSimilarity;

    #[async_trait]
    impl SemanticSimilarity for BrokenSimilarity {
        async fn similarity(&self, _a: &str, _b: &str) -> Result<f64, MatchError> {
            Err(MatchError::Similarity("embedding service down".to_string()))
        }
    }

    struct BrokenDetector;

    #[async_trait]
    impl BiasDetector for BrokenDetector {
        async fn detect_bias(
            &self,
            _ctx: &FairnessContext<'_>,
        ) -> Result<FairnessReport, MatchError> {
            Err(MatchError::Fairness("detector offline".to_string()))
        }
    }

    fn matcher(providers: Vec<Arc<dyn LlmProvider>>) -> HybridMatcher {
        HybridMatcher::new(
            MlScorer::new(Arc::new(StaticSkillTaxonomy), Arc::new(LexicalSimilarity)),
            LlmGateway::new(providers),
            ScoringWeights::hybrid(),
        )
    }

    fn resume() -> ResumeProfile {
        ResumeProfile {
            skills: vec!["React".to_string(), "Node.js".to_string()],
            experience: "5 years of experience".to_string(),
            education: "PhD in Computer Science".to_string(),
            full_text: None,
        }
    }

    fn job() -> JobProfile {
        JobProfile {
            skills: vec![
                "React".to_string(),
                "Node.js".to_string(),
                "Docker".to_string(),
            ],
            experience: "5+ years of experience".to_string(),
            full_text: None,
        }
    }

    fn required(skill: &str, matched: bool) -> SkillMatchEntry {
        SkillMatchEntry {
            skill: skill.to_string(),
            required: true,
            matched,
            match_type: if matched { MatchType::Exact } else { MatchType::None },
            score: if matched { 100 } else { 0 },
            category: None,
        }
    }

    fn assert_bounds(result: &HybridMatchResult) {
        assert!(result.match_percentage <= 100);
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_strategy_table() {
        assert_eq!(select_strategy(true, true), Strategy::Hybrid);
        assert_eq!(select_strategy(true, false), Strategy::MlOnly);
        assert_eq!(select_strategy(false, true), Strategy::LlmOnly);
        assert_eq!(select_strategy(false, false), Strategy::Fallback);
    }

    #[test]
    fn test_blend_weights_by_ml_confidence() {
        let ml = MlAnalysisResult {
            total_score: 70.0,
            dimension_scores: DimensionScores::uniform(70.0),
            confidence: 0.8,
            explanation: Explanation {
                strengths: vec!["Strong frontend background".to_string()],
                weaknesses: vec![],
                recommendations: vec![],
            },
            skill_breakdown: vec![
                required("React", true),
                required("Node.js", true),
                required("Docker", false),
            ],
        };
        let llm = LlmAnalysisResult {
            match_percentage: 90.0,
            matched_skills: vec!["React".to_string(), "NodeJS".to_string()],
            missing_skills: vec!["Docker".to_string()],
            candidate_strengths: vec!["Strong frontend background".to_string()],
            ..Default::default()
        };

        let result = blend(&ml, &llm, "stub", ScoringWeights::hybrid());

        // round(70×0.8 + 90×0.2) = round(56 + 18) = 74
        assert_eq!(result.match_percentage, 74);
        assert!((result.confidence - 0.85).abs() < 1e-9);
        assert_eq!(result.confidence_level, ConfidenceLevel::Medium);
        assert_eq!(result.analysis_method, AnalysisMethod::Hybrid);
        assert_eq!(
            result.matched_skills,
            vec!["React".to_string(), "Node.js".to_string(), "NodeJS".to_string()]
        );
        assert_eq!(result.missing_skills, vec!["Docker".to_string()]);
        assert_eq!(result.candidate_strengths.len(), 1);
        assert!(!result.estimated_dimensions);
    }

    #[test]
    fn test_llm_only_dimension_split() {
        let llm = LlmAnalysisResult {
            match_percentage: 80.0,
            ..Default::default()
        };
        let result = llm_only_result(llm, "stub", ScoringWeights::hybrid());
        assert_eq!(result.scoring_dimensions.skills, 48.0);
        assert_eq!(result.scoring_dimensions.experience, 24.0);
        assert_eq!(result.scoring_dimensions.education, 8.0);
        assert_eq!(result.scoring_dimensions.semantic, 8.0);
        assert!(result.estimated_dimensions);
        assert_eq!(result.confidence_level, ConfidenceLevel::Medium);
    }

    #[tokio::test]
    async fn test_no_text_no_provider_returns_neutral_result() {
        let result = matcher(vec![])
            .analyze_match(&resume(), &job(), None, None, None)
            .await;

        assert_eq!(result.analysis_method, AnalysisMethod::Fallback);
        assert_eq!(result.match_percentage, 50);
        assert_eq!(result.missing_skills, job().skills);
        assert_eq!(result.confidence_level, ConfidenceLevel::Low);
        assert!((result.confidence - 0.3).abs() < 1e-9);
        assert_eq!(result.scoring_dimensions, DimensionScores::uniform(50.0));
        assert_eq!(result.candidate_strengths.len(), 1);
        assert_eq!(result.candidate_weaknesses.len(), 1);
        assert_eq!(result.recommendations.len(), 1);
        assert!(result.fairness_metrics.is_none());
    }

    #[tokio::test]
    async fn test_ml_only_measures_experience_and_education() {
        let result = matcher(vec![])
            .analyze_match(&resume(), &job(), None, Some(RESUME_TEXT), Some(JOB_TEXT))
            .await;

        assert_eq!(result.analysis_method, AnalysisMethod::MlOnly);
        assert_eq!(result.scoring_dimensions.experience, 90.0);
        assert_eq!(result.scoring_dimensions.education, 100.0);
        assert_eq!(result.missing_skills, vec!["Docker".to_string()]);
        assert!(result.matched_skills.contains(&"React".to_string()));
        assert!(result.llm_provider.is_none());
        assert!(!result.skill_breakdown.is_empty());
        assert_bounds(&result);
    }

    #[tokio::test]
    async fn test_profile_full_text_counts_as_present() {
        let mut r = resume();
        r.full_text = Some(RESUME_TEXT.to_string());
        let mut j = job();
        j.full_text = Some(JOB_TEXT.to_string());

        let result = matcher(vec![]).analyze_match(&r, &j, None, None, None).await;
        assert_eq!(result.analysis_method, AnalysisMethod::MlOnly);
    }

    #[tokio::test]
    async fn test_blank_full_text_is_treated_as_missing() {
        let result = matcher(vec![])
            .analyze_match(&resume(), &job(), None, Some("   "), Some(JOB_TEXT))
            .await;
        assert_eq!(result.analysis_method, AnalysisMethod::Fallback);
    }

    #[tokio::test]
    async fn test_hybrid_blends_with_provider() {
        let provider = StubProvider::ok(90.0);
        let m = matcher(vec![provider.clone() as Arc<dyn LlmProvider>]);

        let result = m
            .analyze_match(&resume(), &job(), None, Some(RESUME_TEXT), Some(JOB_TEXT))
            .await;

        let ml = MlScorer::new(Arc::new(StaticSkillTaxonomy), Arc::new(LexicalSimilarity))
            .analyze(
                &resume(),
                &job(),
                Some(RESUME_TEXT),
                Some(JOB_TEXT),
                &ScoringWeights::hybrid(),
            )
            .await
            .unwrap();
        let expected = (ml.total_score * ml.confidence + 90.0 * (1.0 - ml.confidence)).round();

        assert_eq!(result.analysis_method, AnalysisMethod::Hybrid);
        assert_eq!(result.llm_provider.as_deref(), Some("stub"));
        assert_eq!(f64::from(result.match_percentage), expected);
        assert_eq!(result.scoring_dimensions, ml.dimension_scores);
        assert!(result.matched_skills.contains(&"NodeJS".to_string()));
        assert!(result.matched_skills.contains(&"Node.js".to_string()));
        assert_eq!(
            result.recommendations.iter().filter(|r| *r == "Add a Docker project").count(),
            1
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_bounds(&result);
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_ml_only() {
        let provider = StubProvider::failing();
        let m = matcher(vec![provider.clone() as Arc<dyn LlmProvider>]);

        let result = m
            .analyze_match(&resume(), &job(), None, Some(RESUME_TEXT), Some(JOB_TEXT))
            .await;

        assert_eq!(result.analysis_method, AnalysisMethod::MlOnly);
        assert!(result.llm_provider.is_none());
        assert_eq!(result.scoring_dimensions.experience, 90.0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_llm_only_without_full_text() {
        let m = matcher(vec![StubProvider::ok(85.0) as Arc<dyn LlmProvider>]);
        let result = m.analyze_match(&resume(), &job(), None, None, None).await;

        assert_eq!(result.analysis_method, AnalysisMethod::LlmOnly);
        assert_eq!(result.match_percentage, 85);
        assert_eq!(result.confidence_level, ConfidenceLevel::High);
        assert!(result.estimated_dimensions);
        assert!(result.skill_breakdown.is_empty());
        assert_bounds(&result);
    }

    #[tokio::test]
    async fn test_llm_only_failure_returns_neutral_result() {
        let m = matcher(vec![StubProvider::failing() as Arc<dyn LlmProvider>]);
        let result = m.analyze_match(&resume(), &job(), None, None, None).await;
        assert_eq!(result.analysis_method, AnalysisMethod::Fallback);
        assert_eq!(result.match_percentage, 50);
    }

    #[tokio::test]
    async fn test_ml_failure_returns_neutral_result() {
        let m = HybridMatcher::new(
            MlScorer::new(Arc::new(StaticSkillTaxonomy), Arc::new(BrokenSimilarity)),
            LlmGateway::default(),
            ScoringWeights::hybrid(),
        );
        let result = m
            .analyze_match(&resume(), &job(), None, Some(RESUME_TEXT), Some(JOB_TEXT))
            .await;
        assert_eq!(result.analysis_method, AnalysisMethod::Fallback);
        assert_eq!(result.missing_skills.len(), 3);
    }

    #[tokio::test]
    async fn test_fairness_attached_when_full_text_present() {
        let m = matcher(vec![]).with_bias_detector(Arc::new(InclusiveLanguageDetector));
        let result = m
            .analyze_match(
                &resume(),
                &job(),
                None,
                Some(RESUME_TEXT),
                Some("Young rockstar React developer wanted, 5+ years of experience"),
            )
            .await;

        let report = result.fairness_metrics.expect("fairness report attached");
        assert!(!report.flags.is_empty());
        assert!(report.bias_score > 0.0);
    }

    #[tokio::test]
    async fn test_fairness_skipped_without_full_text() {
        let m = matcher(vec![StubProvider::ok(70.0) as Arc<dyn LlmProvider>])
            .with_bias_detector(Arc::new(InclusiveLanguageDetector));
        let result = m.analyze_match(&resume(), &job(), None, None, None).await;
        assert!(result.fairness_metrics.is_none());
    }

    #[tokio::test]
    async fn test_fairness_failure_is_swallowed() {
        let m = matcher(vec![]).with_bias_detector(Arc::new(BrokenDetector));
        let result = m
            .analyze_match(&resume(), &job(), None, Some(RESUME_TEXT), Some(JOB_TEXT))
            .await;
        assert_eq!(result.analysis_method, AnalysisMethod::MlOnly);
        assert!(result.fairness_metrics.is_none());
    }

    #[tokio::test]
    async fn test_custom_weights_are_reported() {
        let m = matcher(vec![]);
        let result = m
            .analyze_match(
                &resume(),
                &job(),
                Some(ScoringWeights::general()),
                Some(RESUME_TEXT),
                Some(JOB_TEXT),
            )
            .await;
        assert_eq!(result.weights_used, ScoringWeights::general());

        let default = m
            .analyze_match(&resume(), &job(), None, Some(RESUME_TEXT), Some(JOB_TEXT))
            .await;
        assert_eq!(default.weights_used, ScoringWeights::hybrid());
    }

    #[tokio::test]
    async fn test_repeated_calls_yield_identical_dimensions() {
        let m = matcher(vec![]);
        let a = m
            .analyze_match(&resume(), &job(), None, Some(RESUME_TEXT), Some(JOB_TEXT))
            .await;
        let b = m
            .analyze_match(&resume(), &job(), None, Some(RESUME_TEXT), Some(JOB_TEXT))
            .await;
        assert_eq!(a.scoring_dimensions, b.scoring_dimensions);
        assert_eq!(a.match_percentage, b.match_percentage);
        assert_ne!(a.analysis_id, b.analysis_id);
    }
}
