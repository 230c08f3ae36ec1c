//! ML scoring path. Runs the four dimension scorers, combines them with the
//! active weights, and estimates how much data backed the result.
//!
//! Pure given pure collaborators: the same inputs always produce the same
//! `MlAnalysisResult`.

use std::sync::Arc;

use tracing::debug;

use crate::matching::education::score_education;
use crate::matching::error::MatchError;
use crate::matching::experience::{score_experience, ExperienceFit, ExperienceScore};
use crate::matching::models::{
    DimensionScores, Explanation, JobProfile, MlAnalysisResult, ResumeProfile,
};
use crate::matching::similarity::{CachedSimilarity, SemanticSimilarity};
use crate::matching::skills::{score_skills, SkillScore};
use crate::matching::taxonomy::SkillTaxonomy;
use crate::matching::weights::ScoringWeights;

const MIN_CONFIDENCE: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 1.0;
const LONG_TEXT_CHARS: usize = 500;
const MEDIUM_TEXT_CHARS: usize = 200;

/// Deterministic multi-dimensional scorer.
#[derive(Clone)]
pub struct MlScorer {
    taxonomy: Arc<dyn SkillTaxonomy>,
    similarity: Arc<dyn SemanticSimilarity>,
}

impl MlScorer {
    pub fn new(taxonomy: Arc<dyn SkillTaxonomy>, similarity: Arc<dyn SemanticSimilarity>) -> Self {
        Self {
            taxonomy,
            similarity,
        }
    }

    pub async fn analyze(
        &self,
        resume: &ResumeProfile,
        job: &JobProfile,
        resume_full_text: Option<&str>,
        job_full_text: Option<&str>,
        weights: &ScoringWeights,
    ) -> Result<MlAnalysisResult, MatchError> {
        // One memo per analysis; skill pairs repeat across job skills.
        let mut similarity = CachedSimilarity::new(self.similarity.as_ref());

        let skills = score_skills(
            &resume.skills,
            &job.skills,
            self.taxonomy.as_ref(),
            &mut similarity,
        )
        .await?;
        let experience = score_experience(&resume.experience, &job.experience);
        let education = score_education(&resume.education);

        let resume_text = resume_full_text
            .map(str::to_string)
            .unwrap_or_else(|| resume_profile_text(resume));
        let job_text = job_full_text
            .map(str::to_string)
            .unwrap_or_else(|| job_profile_text(job));
        let semantic = similarity
            .similarity(&resume_text, &job_text)
            .await?
            .round();

        let dimension_scores = DimensionScores {
            skills: skills.score,
            experience: experience.score,
            education: education.score,
            semantic,
        }
        .clamped();

        let total_score = aggregate(&dimension_scores, weights);
        let confidence = estimate_confidence(resume, resume_full_text, skills.match_ratio());

        debug!(
            total_score,
            confidence,
            skills = dimension_scores.skills,
            experience = dimension_scores.experience,
            education = dimension_scores.education,
            semantic = dimension_scores.semantic,
            cached_pairs = similarity.cached_pairs(),
            "ML scoring complete"
        );

        let explanation = explain(&skills, &experience, &education.rationale, &dimension_scores);

        Ok(MlAnalysisResult {
            total_score,
            dimension_scores,
            confidence,
            explanation,
            skill_breakdown: skills.breakdown,
        })
    }
}

/// Σ(dimension × weight) over the four measured dimensions, in [0, 100].
pub fn aggregate(dimensions: &DimensionScores, weights: &ScoringWeights) -> f64 {
    (dimensions.skills * weights.skills()
        + dimensions.experience * weights.experience()
        + dimensions.education * weights.education()
        + dimensions.semantic * weights.semantic())
    .clamp(0.0, 100.0)
}

/// Data-availability confidence, clamped to [0.1, 1.0].
pub fn estimate_confidence(
    resume: &ResumeProfile,
    resume_full_text: Option<&str>,
    skill_match_ratio: f64,
) -> f64 {
    let mut confidence = 0.0;

    if !resume.skills.is_empty() {
        confidence += 0.3;
    }
    if !resume.experience.trim().is_empty() {
        confidence += 0.2;
    }
    if !resume.education.trim().is_empty() {
        confidence += 0.1;
    }

    let full_text_len = resume_full_text
        .or(resume.full_text.as_deref())
        .map(|t| t.chars().count())
        .unwrap_or(0);
    if full_text_len > LONG_TEXT_CHARS {
        confidence += 0.2;
    } else if full_text_len > MEDIUM_TEXT_CHARS {
        confidence += 0.1;
    }

    confidence += skill_match_ratio.clamp(0.0, 1.0) * 0.2;
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

fn resume_profile_text(resume: &ResumeProfile) -> String {
    if let Some(text) = resume.full_text.as_deref() {
        return text.to_string();
    }
    [
        resume.skills.join(" "),
        resume.experience.clone(),
        resume.education.clone(),
    ]
    .join(" ")
}

fn job_profile_text(job: &JobProfile) -> String {
    if let Some(text) = job.full_text.as_deref() {
        return text.to_string();
    }
    [job.skills.join(" "), job.experience.clone()].join(" ")
}

fn explain(
    skills: &SkillScore,
    experience: &ExperienceScore,
    education_rationale: &str,
    dims: &DimensionScores,
) -> Explanation {
    let mut explanation = Explanation::default();

    let missing: Vec<&str> = skills
        .breakdown
        .iter()
        .filter(|e| e.required && !e.matched)
        .map(|e| e.skill.as_str())
        .collect();

    if skills.total_required > 0 && dims.skills >= 70.0 {
        explanation
            .strengths
            .push(format!("Strong skills alignment: {}", skills.rationale));
    } else if skills.total_required > 0 && dims.skills < 50.0 {
        explanation
            .weaknesses
            .push(format!("Limited skills alignment: {}", skills.rationale));
    }

    if !missing.is_empty() {
        let top: Vec<&str> = missing.iter().take(5).copied().collect();
        explanation
            .weaknesses
            .push(format!("Missing required skills: {}", top.join(", ")));
        explanation.recommendations.push(format!(
            "Build or highlight experience with: {}",
            top.join(", ")
        ));
    }

    match experience.fit {
        ExperienceFit::Exceeds | ExperienceFit::Meets => {
            explanation.strengths.push(experience.rationale.clone())
        }
        ExperienceFit::Below => {
            explanation.weaknesses.push(experience.rationale.clone());
            explanation
                .recommendations
                .push("Emphasise transferable experience to offset the years gap".to_string());
        }
        ExperienceFit::Close => {}
        ExperienceFit::Lexical => explanation.recommendations.push(
            "State years of experience explicitly so it can be compared with the requirement"
                .to_string(),
        ),
    }

    if dims.education >= 80.0 {
        explanation.strengths.push(education_rationale.to_string());
    } else if dims.education <= 20.0 {
        explanation
            .recommendations
            .push("Add education or certification details to the resume".to_string());
    }

    if dims.semantic >= 60.0 {
        explanation
            .strengths
            .push("Resume language closely mirrors the job description".to_string());
    } else if dims.semantic < 20.0 {
        explanation.recommendations.push(
            "Align resume wording with the terminology used in the job description".to_string(),
        );
    }

    explanation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::similarity::LexicalSimilarity;
    use crate::matching::taxonomy::StaticSkillTaxonomy;

    fn scorer() -> MlScorer {
        MlScorer::new(Arc::new(StaticSkillTaxonomy), Arc::new(LexicalSimilarity))
    }

    fn resume(skills: &[&str], experience: &str, education: &str) -> ResumeProfile {
        ResumeProfile {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: experience.to_string(),
            education: education.to_string(),
            full_text: None,
        }
    }

    fn job(skills: &[&str], experience: &str) -> JobProfile {
        JobProfile {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: experience.to_string(),
            full_text: None,
        }
    }

    #[test]
    fn test_aggregate_weighted_sum() {
        let dims = DimensionScores {
            skills: 80.0,
            experience: 90.0,
            education: 100.0,
            semantic: 40.0,
        };
        // 0.5×80 + 0.3×90 + 0.15×100 + 0.05×40 = 40 + 27 + 15 + 2 = 84
        let total = aggregate(&dims, &ScoringWeights::hybrid());
        assert!((total - 84.0).abs() < 1e-9, "total was {total}");
    }

    #[test]
    fn test_general_preset_leaves_cultural_share_unscored() {
        let total = aggregate(&DimensionScores::uniform(100.0), &ScoringWeights::general());
        assert!((total - 95.0).abs() < 1e-9, "total was {total}");
    }

    #[test]
    fn test_confidence_full_data() {
        let mut r = resume(&["Rust"], "5 years", "BSc");
        r.full_text = Some("x".repeat(600));
        // 0.3 + 0.2 + 0.1 + 0.2 + 1.0×0.2 = 1.0
        assert!((estimate_confidence(&r, None, 1.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_medium_text_and_partial_ratio() {
        let r = resume(&["Rust"], "", "");
        let text = "y".repeat(300);
        // 0.3 + 0.1 + 0.5×0.2 = 0.5
        let c = estimate_confidence(&r, Some(&text), 0.5);
        assert!((c - 0.5).abs() < 1e-9, "confidence was {c}");
    }

    #[test]
    fn test_confidence_floor() {
        let r = resume(&[], "", "");
        assert_eq!(estimate_confidence(&r, None, 0.0), 0.1);
    }

    #[tokio::test]
    async fn test_analyze_dimension_scores_in_range() {
        let result = scorer()
            .analyze(
                &resume(&["React", "Node.js"], "5 years of experience", "PhD in Computer Science"),
                &job(&["React", "Node.js", "Docker"], "5+ years of experience"),
                None,
                None,
                &ScoringWeights::hybrid(),
            )
            .await
            .unwrap();

        assert_eq!(result.dimension_scores.experience, 90.0);
        assert_eq!(result.dimension_scores.education, 100.0);
        assert_eq!(result.dimension_scores.skills, 67.0);
        for v in [
            result.dimension_scores.skills,
            result.dimension_scores.experience,
            result.dimension_scores.education,
            result.dimension_scores.semantic,
        ] {
            assert!((0.0..=100.0).contains(&v));
        }
        assert!((0.0..=100.0).contains(&result.total_score));
        assert!(result
            .explanation
            .weaknesses
            .iter()
            .any(|w| w.contains("Docker")));
    }

    #[tokio::test]
    async fn test_analyze_empty_inputs() {
        let result = scorer()
            .analyze(
                &ResumeProfile::default(),
                &JobProfile::default(),
                None,
                None,
                &ScoringWeights::hybrid(),
            )
            .await
            .unwrap();
        assert_eq!(result.dimension_scores.skills, 0.0);
        assert_eq!(result.dimension_scores.education, 20.0);
        assert_eq!(result.dimension_scores.experience, 20.0);
        assert_eq!(result.dimension_scores.semantic, 0.0);
        // Only the "nothing required" skill ratio contributes: 1.0 × 0.2
        assert!((result.confidence - 0.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_analyze_is_deterministic() {
        let r = resume(&["Python", "SQL"], "3 yrs experience", "Bachelor of Science");
        let j = job(&["Python", "PostgreSQL", "Airflow"], "4 years of experience");
        let s = scorer();
        let a = s
            .analyze(&r, &j, Some("python sql etl"), Some("python airflow"), &ScoringWeights::hybrid())
            .await
            .unwrap();
        let b = s
            .analyze(&r, &j, Some("python sql etl"), Some("python airflow"), &ScoringWeights::hybrid())
            .await
            .unwrap();
        assert_eq!(a, b);
    }
}
