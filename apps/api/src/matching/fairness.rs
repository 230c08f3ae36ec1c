//! Fairness enrichment: post-hoc bias signals attached to a match result.
//!
//! Runs after scoring and never influences the score. A failure here is
//! logged by the blender and the result is returned without fairness data.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::error::MatchError;
use crate::matching::models::{DimensionScores, JobProfile, ResumeProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasCategory {
    Age,
    Gender,
    CulturalFit,
    Ability,
    ProtectedAttribute,
    CredentialWeighting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSource {
    JobDescription,
    CandidateProfile,
    Scoring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasRiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasFlag {
    pub category: BiasCategory,
    pub source: FlagSource,
    pub term: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessReport {
    pub bias_score: f64, // 0.0 – 1.0
    pub risk_level: BiasRiskLevel,
    pub flags: Vec<BiasFlag>,
    pub recommendations: Vec<String>,
}

/// Everything the detector may look at for one analysis.
pub struct FairnessContext<'a> {
    pub candidate: &'a ResumeProfile,
    pub job: &'a JobProfile,
    pub resume_text: &'a str,
    pub job_text: &'a str,
    pub match_percentage: u8,
    pub dimensions: &'a DimensionScores,
}

#[async_trait]
pub trait BiasDetector: Send + Sync {
    async fn detect_bias(&self, ctx: &FairnessContext<'_>) -> Result<FairnessReport, MatchError>;
}

/// Coded or exclusionary phrasing in job descriptions.
const JOB_PHRASES: &[(BiasCategory, &str)] = &[
    (BiasCategory::Age, "young"),
    (BiasCategory::Age, "youthful"),
    (BiasCategory::Age, "digital native"),
    (BiasCategory::Age, "recent graduate"),
    (BiasCategory::Age, "fresh graduate"),
    (BiasCategory::Age, "overqualified"),
    (BiasCategory::Gender, "rockstar"),
    (BiasCategory::Gender, "ninja"),
    (BiasCategory::Gender, "manpower"),
    (BiasCategory::Gender, "salesman"),
    (BiasCategory::Gender, "chairman"),
    (BiasCategory::Gender, "he will"),
    (BiasCategory::Gender, "she will"),
    (BiasCategory::CulturalFit, "culture fit"),
    (BiasCategory::CulturalFit, "native english speaker"),
    (BiasCategory::CulturalFit, "native speaker"),
    (BiasCategory::CulturalFit, "clean-shaven"),
    (BiasCategory::Ability, "able-bodied"),
    (BiasCategory::Ability, "perfect vision"),
    (BiasCategory::Ability, "must be able to stand"),
];

/// Protected attributes a candidate may have disclosed.
const CANDIDATE_PHRASES: &[&str] = &[
    "date of birth",
    "marital status",
    "married",
    "religion",
    "nationality",
    "gender",
    "age",
    "photo",
];

/// Education outweighing skills by this many points is flagged.
const CREDENTIAL_GAP_POINTS: f64 = 40.0;

static JOB_PATTERNS: LazyLock<Vec<(BiasCategory, &'static str, Regex)>> = LazyLock::new(|| {
    JOB_PHRASES
        .iter()
        .map(|&(category, phrase)| (category, phrase, word_regex(phrase)))
        .collect()
});

static CANDIDATE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    CANDIDATE_PHRASES
        .iter()
        .map(|&phrase| {
            // "age" and "gender" only count as disclosures when labelled ("Age: 34").
            let pattern = if matches!(phrase, "age" | "gender") {
                format!(r"(?i)\b{}\s*:", regex::escape(phrase))
            } else {
                format!(r"(?i)\b{}\b", regex::escape(phrase))
            };
            let re = Regex::new(&pattern).expect("fairness pattern is a valid regex");
            (phrase, re)
        })
        .collect()
});

fn word_regex(phrase: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase)))
        .expect("fairness pattern is a valid regex")
}

/// Keyword-based detector for exclusionary job language, disclosed protected
/// attributes, and credential-heavy scoring.
#[derive(Debug, Default, Clone)]
pub struct InclusiveLanguageDetector;

#[async_trait]
impl BiasDetector for InclusiveLanguageDetector {
    async fn detect_bias(&self, ctx: &FairnessContext<'_>) -> Result<FairnessReport, MatchError> {
        let d = ctx.dimensions;
        if [d.skills, d.experience, d.education, d.semantic]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(MatchError::Fairness(
                "scoring dimensions must be finite".to_string(),
            ));
        }
        Ok(assess(ctx))
    }
}

fn assess(ctx: &FairnessContext<'_>) -> FairnessReport {
    let mut flags = Vec::new();

    // Structured profile fields are scanned alongside the full texts.
    let job_skills = ctx.job.skills.join(", ");
    let job_sources = [ctx.job_text, ctx.job.experience.as_str(), job_skills.as_str()];
    let candidate_sources = [
        ctx.resume_text,
        ctx.candidate.experience.as_str(),
        ctx.candidate.education.as_str(),
    ];

    for (category, phrase, re) in JOB_PATTERNS.iter() {
        if job_sources.iter().any(|text| re.is_match(text)) {
            flags.push(BiasFlag {
                category: *category,
                source: FlagSource::JobDescription,
                term: phrase.to_string(),
                message: format!("Job description uses potentially exclusionary phrase '{phrase}'"),
            });
        }
    }

    for (phrase, re) in CANDIDATE_PATTERNS.iter() {
        if candidate_sources.iter().any(|text| re.is_match(text)) {
            flags.push(BiasFlag {
                category: BiasCategory::ProtectedAttribute,
                source: FlagSource::CandidateProfile,
                term: phrase.to_string(),
                message: format!(
                    "Resume discloses '{phrase}'; it must not influence the evaluation"
                ),
            });
        }
    }

    let gap = ctx.dimensions.education - ctx.dimensions.skills;
    if gap >= CREDENTIAL_GAP_POINTS {
        flags.push(BiasFlag {
            category: BiasCategory::CredentialWeighting,
            source: FlagSource::Scoring,
            term: "education".to_string(),
            message: format!(
                "Education score exceeds skills score by {gap:.0} points; credentials may be \
                 outweighing demonstrated ability for a {}% match",
                ctx.match_percentage
            ),
        });
    }

    let weight = |source: FlagSource| match source {
        FlagSource::JobDescription => 0.15,
        FlagSource::CandidateProfile => 0.05,
        FlagSource::Scoring => 0.2,
    };
    let bias_score: f64 = flags
        .iter()
        .map(|f| weight(f.source))
        .sum::<f64>()
        .clamp(0.0, 1.0);

    let risk_level = if bias_score >= 0.5 {
        BiasRiskLevel::High
    } else if bias_score >= 0.2 {
        BiasRiskLevel::Medium
    } else {
        BiasRiskLevel::Low
    };

    FairnessReport {
        bias_score,
        risk_level,
        recommendations: recommendations_for(&flags),
        flags,
    }
}

fn recommendations_for(flags: &[BiasFlag]) -> Vec<String> {
    let mut recs: Vec<String> = Vec::new();
    let mut push = |rec: &str| {
        if !recs.iter().any(|r| r == rec) {
            recs.push(rec.to_string());
        }
    };

    for flag in flags {
        match flag.category {
            BiasCategory::Age => push("Replace age-coded wording with the concrete skills required"),
            BiasCategory::Gender => push("Use gender-neutral role titles and pronouns"),
            BiasCategory::CulturalFit => {
                push("Describe required language proficiency or values explicitly instead of 'fit'")
            }
            BiasCategory::Ability => {
                push("List only physical requirements that are essential, and offer accommodation")
            }
            BiasCategory::ProtectedAttribute => {
                push("Redact protected personal details before human review")
            }
            BiasCategory::CredentialWeighting => {
                push("Review whether the degree requirement is essential for this role")
            }
        }
    }
    recs
}
