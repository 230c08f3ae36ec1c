//! Education dimension scorer: first keyword tier that matches wins.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Doctorate,
    Masters,
    Bachelors,
    Associate,
    Certification,
    /// Non-empty text with no recognised credential.
    Alternative,
    Missing,
}

impl EducationLevel {
    pub fn score(self) -> f64 {
        match self {
            EducationLevel::Doctorate | EducationLevel::Masters => 100.0,
            EducationLevel::Bachelors => 80.0,
            EducationLevel::Associate => 60.0,
            EducationLevel::Certification => 50.0,
            EducationLevel::Alternative => 40.0,
            EducationLevel::Missing => 20.0,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            EducationLevel::Doctorate => "Doctoral degree",
            EducationLevel::Masters => "Master's degree",
            EducationLevel::Bachelors => "Bachelor's degree",
            EducationLevel::Associate => "Associate degree or diploma",
            EducationLevel::Certification => "Professional certification",
            EducationLevel::Alternative => "Self-taught or alternative education",
            EducationLevel::Missing => "No education information",
        }
    }
}

static TIERS: LazyLock<Vec<(EducationLevel, Regex)>> = LazyLock::new(|| {
    [
        (
            EducationLevel::Doctorate,
            r"(?i)\b(ph\.?\s?d|doctorate|doctoral|doctor of)\b",
        ),
        (
            EducationLevel::Masters,
            r"(?i)\b(master'?s?|mba|m\.sc|msc|m\.s|m\.eng|meng|(?-i:MS))\b",
        ),
        (
            EducationLevel::Bachelors,
            r"(?i)\b(bachelor'?s?|b\.sc|bsc|b\.s|b\.a|b\.eng|beng|b\.tech|btech|undergraduate|(?-i:BS|BA))\b",
        ),
        (
            EducationLevel::Associate,
            r"(?i)\b(associate'?s?|diploma)\b",
        ),
        (
            EducationLevel::Certification,
            r"(?i)\b(certifications?|certificates?|certified)\b",
        ),
    ]
    .into_iter()
    .map(|(level, pattern)| {
        (
            level,
            Regex::new(pattern).expect("education pattern is a valid regex"),
        )
    })
    .collect()
});

#[derive(Debug, Clone, PartialEq)]
pub struct EducationScore {
    pub score: f64,
    pub level: EducationLevel,
    pub rationale: String,
}

pub fn classify_education(text: &str) -> EducationLevel {
    if text.trim().is_empty() {
        return EducationLevel::Missing;
    }
    TIERS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(level, _)| *level)
        .unwrap_or(EducationLevel::Alternative)
}

pub fn score_education(text: &str) -> EducationScore {
    let level = classify_education(text);
    EducationScore {
        score: level.score(),
        level,
        rationale: level.describe().to_string(),
    }
}
