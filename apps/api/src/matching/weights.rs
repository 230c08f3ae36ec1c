//! Scoring weights for the four measured dimensions.
//!
//! Weights are validated when constructed (including on deserialization):
//! skills + experience + education + semantic must sum to 1.0 within
//! `WEIGHT_SUM_TOLERANCE`. The unscored `cultural` share exists only in the
//! `general` preset. Nothing is silently rescaled;
//! `ScoringWeights::normalized` is the explicit opt-in.

use serde::{Deserialize, Serialize};

use crate::matching::error::MatchError;

pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// General-purpose weighting. Keeps a cultural-assessment share that no
/// scorer measures, so totals computed with it top out at 95.
pub const GENERAL_WEIGHTS: RawWeights = RawWeights {
    skills: 0.45,
    experience: 0.25,
    education: 0.15,
    semantic: 0.10,
    cultural: 0.05,
};

/// Weighting used by the hybrid engine (cultural assessment removed).
pub const HYBRID_WEIGHTS: RawWeights = RawWeights {
    skills: 0.50,
    experience: 0.30,
    education: 0.15,
    semantic: 0.05,
    cultural: 0.0,
};

/// Unvalidated weight values, as supplied by config or a request body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub semantic: f64,
    #[serde(default)]
    pub cultural: f64,
}

impl RawWeights {
    pub fn sum(&self) -> f64 {
        self.measured_sum() + self.cultural
    }

    /// Sum of the four scored dimensions.
    pub fn measured_sum(&self) -> f64 {
        self.skills + self.experience + self.education + self.semantic
    }

    fn is_general_preset(&self) -> bool {
        self.fields()
            .iter()
            .zip(GENERAL_WEIGHTS.fields())
            .all(|((_, a), (_, b))| (a - b).abs() <= f64::EPSILON)
    }

    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("skills", self.skills),
            ("experience", self.experience),
            ("education", self.education),
            ("semantic", self.semantic),
            ("cultural", self.cultural),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPreset {
    General,
    Hybrid,
}

impl std::str::FromStr for WeightPreset {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(WeightPreset::General),
            "hybrid" => Ok(WeightPreset::Hybrid),
            other => Err(MatchError::InvalidWeights(format!(
                "unknown weight preset '{other}' (expected 'general' or 'hybrid')"
            ))),
        }
    }
}

/// Validated weights. Construct with `ScoringWeights::new`, a preset, or
/// `ScoringWeights::normalized`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights", into = "RawWeights")]
pub struct ScoringWeights {
    skills: f64,
    experience: f64,
    education: f64,
    semantic: f64,
    cultural: f64,
}

impl ScoringWeights {
    /// Validates that no weight is negative or non-finite and that the four
    /// scored weights sum to 1.0 within tolerance. A non-zero `cultural`
    /// share is accepted only as the exact `general` preset.
    pub fn new(raw: RawWeights) -> Result<Self, MatchError> {
        for (name, value) in raw.fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidWeights(format!(
                    "weight '{name}' must be a finite non-negative number, got {value}"
                )));
            }
        }

        let general = raw.is_general_preset();
        if raw.cultural > 0.0 && !general {
            return Err(MatchError::InvalidWeights(
                "'cultural' is not scored; it is only available through the general preset"
                    .to_string(),
            ));
        }

        let sum = if general { raw.sum() } else { raw.measured_sum() };
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(MatchError::InvalidWeights(format!(
                "skills + experience + education + semantic must sum to 1.0 \
                 (±{WEIGHT_SUM_TOLERANCE}), got {sum:.4}"
            )));
        }

        Ok(Self {
            skills: raw.skills,
            experience: raw.experience,
            education: raw.education,
            semantic: raw.semantic,
            cultural: raw.cultural,
        })
    }

    pub fn preset(preset: WeightPreset) -> Self {
        let raw = match preset {
            WeightPreset::General => GENERAL_WEIGHTS,
            WeightPreset::Hybrid => HYBRID_WEIGHTS,
        };
        Self {
            skills: raw.skills,
            experience: raw.experience,
            education: raw.education,
            semantic: raw.semantic,
            cultural: raw.cultural,
        }
    }

    pub fn general() -> Self {
        Self::preset(WeightPreset::General)
    }

    pub fn hybrid() -> Self {
        Self::preset(WeightPreset::Hybrid)
    }

    /// Rescales the four scored weights so they sum to 1.0. `cultural` is
    /// dropped. Fails when every scored weight is zero or any weight is
    /// negative.
    pub fn normalized(raw: RawWeights) -> Result<Self, MatchError> {
        if raw.fields().iter().any(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(MatchError::InvalidWeights(
                "cannot normalize negative or non-finite weights".to_string(),
            ));
        }
        let sum = raw.measured_sum();
        if sum <= f64::EPSILON {
            return Err(MatchError::InvalidWeights(
                "cannot normalize weights that sum to zero".to_string(),
            ));
        }
        Ok(Self {
            skills: raw.skills / sum,
            experience: raw.experience / sum,
            education: raw.education / sum,
            semantic: raw.semantic / sum,
            cultural: 0.0,
        })
    }

    pub fn skills(&self) -> f64 {
        self.skills
    }

    pub fn experience(&self) -> f64 {
        self.experience
    }

    pub fn education(&self) -> f64 {
        self.education
    }

    pub fn semantic(&self) -> f64 {
        self.semantic
    }

    pub fn cultural(&self) -> f64 {
        self.cultural
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::hybrid()
    }
}

impl TryFrom<RawWeights> for ScoringWeights {
    type Error = MatchError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        ScoringWeights::new(raw)
    }
}

impl From<ScoringWeights> for RawWeights {
    fn from(w: ScoringWeights) -> Self {
        RawWeights {
            skills: w.skills,
            experience: w.experience,
            education: w.education,
            semantic: w.semantic,
            cultural: w.cultural,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(skills: f64, experience: f64, education: f64, semantic: f64) -> RawWeights {
        RawWeights {
            skills,
            experience,
            education,
            semantic,
            cultural: 0.0,
        }
    }

    #[test]
    fn test_presets_sum_to_one() {
        assert!((GENERAL_WEIGHTS.sum() - 1.0).abs() < 1e-9);
        assert!((HYBRID_WEIGHTS.sum() - 1.0).abs() < 1e-9);
        assert!(ScoringWeights::new(GENERAL_WEIGHTS).is_ok());
        assert!(ScoringWeights::new(HYBRID_WEIGHTS).is_ok());
    }

    #[test]
    fn test_default_is_hybrid_preset() {
        let w = ScoringWeights::default();
        assert_eq!(w.skills(), 0.50);
        assert_eq!(w.experience(), 0.30);
        assert_eq!(w.education(), 0.15);
        assert_eq!(w.semantic(), 0.05);
        assert_eq!(w.cultural(), 0.0);
    }

    #[test]
    fn test_sum_within_tolerance_accepted() {
        assert!(ScoringWeights::new(raw(0.5, 0.3, 0.15, 0.0505)).is_ok());
    }

    #[test]
    fn test_sum_outside_tolerance_rejected() {
        let err = ScoringWeights::new(raw(0.5, 0.3, 0.15, 0.1)).unwrap_err();
        assert!(matches!(err, MatchError::InvalidWeights(_)));
        assert!(ScoringWeights::new(raw(0.4, 0.3, 0.15, 0.05)).is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        assert!(ScoringWeights::new(raw(1.2, -0.2, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<ScoringWeights, _> = serde_json::from_str(
            r#"{"skills":0.5,"experience":0.3,"education":0.15,"semantic":0.05}"#,
        );
        assert!(ok.is_ok());

        let bad: Result<ScoringWeights, _> = serde_json::from_str(
            r#"{"skills":0.9,"experience":0.3,"education":0.15,"semantic":0.05}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_normalized_rescales_to_one() {
        let w = ScoringWeights::normalized(raw(2.0, 1.0, 1.0, 0.0)).unwrap();
        assert!((w.skills() - 0.5).abs() < 1e-9);
        assert!((w.experience() - 0.25).abs() < 1e-9);
        let total = w.skills() + w.experience() + w.education() + w.semantic() + w.cultural();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cultural_share_outside_general_preset_rejected() {
        let all_cultural: Result<ScoringWeights, _> = serde_json::from_str(
            r#"{"skills":0,"experience":0,"education":0,"semantic":0,"cultural":1.0}"#,
        );
        assert!(all_cultural.is_err());

        let shifted = RawWeights {
            cultural: 0.05,
            ..raw(0.40, 0.30, 0.15, 0.10)
        };
        let err = ScoringWeights::new(shifted).unwrap_err();
        assert!(matches!(err, MatchError::InvalidWeights(_)));
    }

    #[test]
    fn test_general_preset_survives_serde_round_trip() {
        let json = serde_json::to_string(&ScoringWeights::general()).unwrap();
        let back: ScoringWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ScoringWeights::general());
    }

    #[test]
    fn test_normalized_drops_cultural_share() {
        let w = ScoringWeights::normalized(RawWeights {
            cultural: 3.0,
            ..raw(1.0, 1.0, 0.0, 0.0)
        })
        .unwrap();
        assert_eq!(w.cultural(), 0.0);
        assert!((w.skills() - 0.5).abs() < 1e-9);
        assert!(ScoringWeights::new(w.into()).is_ok());
    }

    #[test]
    fn test_normalized_rejects_all_zero() {
        assert!(ScoringWeights::normalized(raw(0.0, 0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("General".parse::<WeightPreset>().unwrap(), WeightPreset::General);
        assert_eq!(" hybrid ".parse::<WeightPreset>().unwrap(), WeightPreset::Hybrid);
        assert!("balanced".parse::<WeightPreset>().is_err());
    }
}
