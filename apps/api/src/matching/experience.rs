//! Experience dimension scorer.
//!
//! Years of experience are pulled from free text with an ordered list of
//! patterns; the first pattern that matches a text wins. When either side
//! has no extractable year count the score falls back to lexical similarity
//! of the two descriptions, clamped to [20, 80].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const LEXICAL_FLOOR: f64 = 20.0;
const LEXICAL_CEILING: f64 = 80.0;

static YEAR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(\d{1,2})\s*\+?\s*years?\s+of\s+(?:\w+\s+)?experience",
        r"(?i)\b(\d{1,2})\s*\+?\s*years?\s+in\b",
        r"(?i)\b(\d{1,2})\s*\+?\s*yrs?\.?\s+(?:of\s+)?experience",
        r"(?i)experience\s*:\s*\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)",
        r"(?i)\b(\d{1,2})\s*\+?\s*years?\s+experience",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("year pattern is a valid regex"))
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceFit {
    Exceeds,
    Meets,
    Close,
    Below,
    /// No year counts on one side; scored by text similarity.
    Lexical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceScore {
    pub score: f64, // 0 – 100
    pub fit: ExperienceFit,
    pub resume_years: Option<u32>,
    pub required_years: Option<u32>,
    pub rationale: String,
}

/// First year count found by the ordered patterns, if any.
pub fn extract_years(text: &str) -> Option<u32> {
    YEAR_PATTERNS.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
    })
}

pub fn score_experience(resume_experience: &str, job_experience: &str) -> ExperienceScore {
    let resume_years = extract_years(resume_experience);
    let required_years = extract_years(job_experience);

    if let (Some(have), Some(need)) = (resume_years, required_years) {
        let (have_f, need_f) = (have as f64, need as f64);
        let (score, fit) = if have_f >= need_f * 1.5 {
            (100.0, ExperienceFit::Exceeds)
        } else if have_f >= need_f {
            (90.0, ExperienceFit::Meets)
        } else if have_f >= need_f * 0.7 {
            (70.0, ExperienceFit::Close)
        } else {
            (40.0, ExperienceFit::Below)
        };

        let rationale = match fit {
            ExperienceFit::Exceeds => format!("{have} years exceeds the {need} years required"),
            ExperienceFit::Meets => format!("{have} years meets the {need} years required"),
            ExperienceFit::Close => format!("{have} years is close to the {need} years required"),
            _ => format!("{have} years is below the {need} years required"),
        };

        return ExperienceScore {
            score,
            fit,
            resume_years,
            required_years,
            rationale,
        };
    }

    let score = lexical_score(resume_experience, job_experience);
    ExperienceScore {
        score,
        fit: ExperienceFit::Lexical,
        resume_years,
        required_years,
        rationale: "Years of experience not stated on both sides; compared descriptions"
            .to_string(),
    }
}

fn lexical_score(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return LEXICAL_FLOOR;
    }
    (strsim::sorensen_dice(&a, &b) * 100.0).clamp(LEXICAL_FLOOR, LEXICAL_CEILING)
}
