//! Skills dimension scorer.
//!
//! For every job-required skill, match attempts run in strict priority order
//! and stop at the first success:
//! 1. exact (normalized, case-insensitive) → 100
//! 2. related-skill neighbour (similarity ≥ 0.7) → 90 if > 0.9, else 70
//! 3. embedding similarity ≥ 0.6 against any resume skill → round(sim × 60)
//!
//! Each required skill adds up to 100 to the total and exactly 100 to the
//! maximum. Up to `MAX_BONUS_SKILLS` extra resume skills add
//! `BONUS_SKILL_POINTS` to both.

use std::collections::HashSet;

use tracing::debug;

use crate::matching::error::MatchError;
use crate::matching::models::{MatchType, SkillMatchEntry};
use crate::matching::similarity::CachedSimilarity;
use crate::matching::taxonomy::SkillTaxonomy;

pub const RELATED_TOP_N: usize = 10;
pub const RELATED_MIN_SIMILARITY: f64 = 0.7;
pub const RELATED_STRONG_SIMILARITY: f64 = 0.9;
pub const SEMANTIC_SIMILARITY_FLOOR: f64 = 0.6;
pub const MAX_BONUS_SKILLS: usize = 5;
pub const BONUS_SKILL_POINTS: u32 = 10;

const REQUIRED_SKILL_POINTS: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct SkillScore {
    /// 0 – 100
    pub score: f64,
    pub breakdown: Vec<SkillMatchEntry>,
    pub matched_required: usize,
    pub total_required: usize,
    pub rationale: String,
}

impl SkillScore {
    /// Matched over total required skills; 1.0 when nothing is required.
    pub fn match_ratio(&self) -> f64 {
        if self.total_required == 0 {
            1.0
        } else {
            self.matched_required as f64 / self.total_required as f64
        }
    }
}

struct ResumeSkill<'a> {
    original: &'a str,
    normalized: String,
    category: Option<String>,
}

pub async fn score_skills(
    resume_skills: &[String],
    job_skills: &[String],
    taxonomy: &dyn SkillTaxonomy,
    similarity: &mut CachedSimilarity<'_>,
) -> Result<SkillScore, MatchError> {
    let resume: Vec<ResumeSkill> = resume_skills
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            let n = taxonomy.normalize_skill(s);
            ResumeSkill {
                original: s.as_str(),
                normalized: n.normalized,
                category: n.category,
            }
        })
        .collect();
    let resume_set: HashSet<&str> = resume.iter().map(|r| r.normalized.as_str()).collect();

    let mut breakdown = Vec::new();
    let mut job_set: HashSet<String> = HashSet::new();
    let mut total_score: u32 = 0;
    let mut max_score: u32 = 0;
    let mut matched_required = 0;

    for job_skill in job_skills.iter().filter(|s| !s.trim().is_empty()) {
        let job = taxonomy.normalize_skill(job_skill);
        job_set.insert(job.normalized.clone());

        let (match_type, score) =
            match_one(&job.normalized, &resume, &resume_set, taxonomy, similarity).await?;
        let matched = match_type != MatchType::None;
        if matched {
            matched_required += 1;
        }

        debug!(skill = %job_skill, ?match_type, score, "scored required skill");

        total_score += score;
        max_score += REQUIRED_SKILL_POINTS;
        breakdown.push(SkillMatchEntry {
            skill: job_skill.clone(),
            required: true,
            matched,
            match_type,
            score,
            category: job.category,
        });
    }

    let total_required = breakdown.len();

    let mut seen_bonus: HashSet<&str> = HashSet::new();
    for skill in &resume {
        if seen_bonus.len() >= MAX_BONUS_SKILLS {
            break;
        }
        if job_set.contains(&skill.normalized) || !seen_bonus.insert(skill.normalized.as_str()) {
            continue;
        }
        total_score += BONUS_SKILL_POINTS;
        max_score += BONUS_SKILL_POINTS;
        breakdown.push(SkillMatchEntry {
            skill: skill.original.to_string(),
            required: false,
            matched: true,
            match_type: MatchType::Exact,
            score: BONUS_SKILL_POINTS,
            category: skill.category.clone(),
        });
    }

    let score = if total_required == 0 || max_score == 0 {
        0.0
    } else {
        (100.0 * total_score as f64 / max_score as f64)
            .round()
            .clamp(0.0, 100.0)
    };

    let rationale = if total_required == 0 {
        "Job lists no required skills".to_string()
    } else {
        format!("{matched_required}/{total_required} required skills matched")
    };

    Ok(SkillScore {
        score,
        breakdown,
        matched_required,
        total_required,
        rationale,
    })
}

async fn match_one(
    job_skill: &str,
    resume: &[ResumeSkill<'_>],
    resume_set: &HashSet<&str>,
    taxonomy: &dyn SkillTaxonomy,
    similarity: &mut CachedSimilarity<'_>,
) -> Result<(MatchType, u32), MatchError> {
    if resume_set.contains(job_skill) {
        return Ok((MatchType::Exact, 100));
    }

    // Neighbours arrive most-similar first, so the first hit is the best.
    for related in taxonomy.find_related_skills(job_skill, RELATED_TOP_N) {
        if related.similarity < RELATED_MIN_SIMILARITY {
            continue;
        }
        let neighbour = taxonomy.normalize_skill(&related.skill).normalized;
        if resume_set.contains(neighbour.as_str()) {
            let score = if related.similarity > RELATED_STRONG_SIMILARITY {
                90
            } else {
                70
            };
            return Ok((MatchType::Related, score));
        }
    }

    let mut best: Option<f64> = None;
    for skill in resume {
        let sim = similarity.similarity(job_skill, &skill.normalized).await? / 100.0;
        if sim >= SEMANTIC_SIMILARITY_FLOOR && best.map_or(true, |b| sim > b) {
            best = Some(sim);
        }
    }

    Ok(match best {
        Some(sim) => (MatchType::Semantic, (sim * 60.0).round() as u32),
        None => (MatchType::None, 0),
    })
}
