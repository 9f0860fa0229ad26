//! Banded recalibration of untrusted judge scores.
//!
//! The judge's absolute score varies between calls, while the validated skill
//! ratio comes from a closed comparison against the job requirements. The ratio
//! selects a band and the raw score is only trusted inside that band. Scores
//! jump at band edges (e.g. ratio 0.79 caps at 80, ratio 0.80 floors at 75);
//! that step is part of the policy.
//!
//! Calibration is not idempotent: feeding a calibrated score back in can move
//! it again.

use log::debug;
use serde::{Deserialize, Serialize};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Fraction of the Very Poor window a low-match candidate may reach
const LOW_MATCH_RANGE_FRACTION: f64 = 0.3;

/// Points added per unit of ratio above the Outstanding threshold
const OUTSTANDING_SLOPE: f64 = 150.0;

/// Ratio window mapped to an allowed score range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreBand {
    Outstanding,
    Excellent,
    Good,
    Average,
    Poor,
    VeryPoor,
}

/// Inclusive lower ratio bounds, highest first
const BAND_THRESHOLDS: [(f64, ScoreBand); 5] = [
    (0.9, ScoreBand::Outstanding),
    (0.8, ScoreBand::Excellent),
    (0.6, ScoreBand::Good),
    (0.4, ScoreBand::Average),
    (0.2, ScoreBand::Poor),
];

impl ScoreBand {
    pub fn for_ratio(ratio: f64) -> Self {
        BAND_THRESHOLDS
            .iter()
            .find(|(threshold, _)| ratio >= *threshold)
            .map(|(_, band)| *band)
            .unwrap_or(ScoreBand::VeryPoor)
    }

    pub fn min_score(self) -> f64 {
        match self {
            ScoreBand::Outstanding => 85.0,
            ScoreBand::Excellent => 75.0,
            ScoreBand::Good => 60.0,
            ScoreBand::Average => 45.0,
            ScoreBand::Poor => 15.0,
            ScoreBand::VeryPoor => 5.0,
        }
    }

    pub fn max_allowed(self) -> f64 {
        match self {
            ScoreBand::Outstanding => 100.0,
            ScoreBand::Excellent => 90.0,
            ScoreBand::Good => 80.0,
            ScoreBand::Average => 65.0,
            ScoreBand::Poor => 45.0,
            ScoreBand::VeryPoor => 25.0,
        }
    }

    /// Lower ratio bound of the band
    pub fn threshold(self) -> f64 {
        BAND_THRESHOLDS
            .iter()
            .find(|(_, band)| *band == self)
            .map(|(threshold, _)| *threshold)
            .unwrap_or(0.0)
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Outstanding => "Outstanding",
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Average => "Average",
            ScoreBand::Poor => "Poor",
            ScoreBand::VeryPoor => "Very Poor",
        }
    }

    /// Ceiling applied to low-match candidates
    pub fn low_match_ceiling(self) -> f64 {
        self.min_score() + (self.max_allowed() - self.min_score()) * LOW_MATCH_RANGE_FRACTION
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which calibration rule produced the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adjustment {
    /// No required skills; raw score clamped only
    Clamped,
    OutstandingBoost,
    LowMatchPenalty,
    CappedDown,
    BoostedUp,
    Validated,
}

impl std::fmt::Display for Adjustment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Adjustment::Clamped => "no validation applied",
            Adjustment::OutstandingBoost => "outstanding performance boost",
            Adjustment::LowMatchPenalty => "low-match adjustment",
            Adjustment::CappedDown => "score capped down",
            Adjustment::BoostedUp => "score boosted up",
            Adjustment::Validated => "score validated",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub score: f64,
    pub band: Option<ScoreBand>,
    pub adjustment: Adjustment,
}

/// Calibrated score in `[0, 100]`
pub fn calibrate(raw_score: f64, ratio: f64, has_requirements: bool) -> f64 {
    explain(raw_score, ratio, has_requirements).score
}

/// Calibrate and report the band and rule that fired.
///
/// Rules, first match wins:
/// 1. ratio >= 0.9: `min(85 + (ratio - 0.9) * 150, 100)`, raw score ignored
/// 2. ratio < 0.2: `min(raw, 5 + 20 * 0.3)`
/// 3. raw above the band ceiling: ceiling
/// 4. raw below the band floor with ratio >= 0.8: floor
/// 5. otherwise the raw score
pub fn explain(raw_score: f64, ratio: f64, has_requirements: bool) -> Calibration {
    let raw = sanitize_score(raw_score);

    if !has_requirements {
        return Calibration {
            score: clamp_score(raw),
            band: None,
            adjustment: Adjustment::Clamped,
        };
    }

    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    let band = ScoreBand::for_ratio(ratio);
    let min_score = band.min_score();
    let max_allowed = band.max_allowed();

    let (score, adjustment) = if band == ScoreBand::Outstanding {
        let outstanding = min_score + (ratio - band.threshold()) * OUTSTANDING_SLOPE;
        (outstanding.min(max_allowed), Adjustment::OutstandingBoost)
    } else if band == ScoreBand::VeryPoor {
        (raw.min(band.low_match_ceiling()), Adjustment::LowMatchPenalty)
    } else if raw > max_allowed {
        (max_allowed, Adjustment::CappedDown)
    } else if raw < min_score && ratio >= ScoreBand::Excellent.threshold() {
        (min_score, Adjustment::BoostedUp)
    } else {
        (raw, Adjustment::Validated)
    };

    let score = clamp_score(score);
    debug!(
        "{}: {:.1}% -> {:.1}% ({:.1}% skill match, {} band)",
        adjustment,
        raw,
        score,
        ratio * 100.0,
        band
    );

    Calibration {
        score,
        band: Some(band),
        adjustment,
    }
}

pub fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// NaN scores count as zero; infinities are left for clamping
fn sanitize_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score
    }
}
