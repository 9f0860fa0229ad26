//! Shortlist report structures shared by every output format

use crate::processing::candidate::{RequirementSet, ValidatedCandidateRecord};
use crate::processing::shortlister::Shortlist;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ranked candidates plus everything needed to present them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortlistReport {
    pub metadata: ReportMetadata,

    /// Requirements the candidates were validated against
    pub requirements: RequirementSet,

    /// Candidates, best first
    pub candidates: Vec<ValidatedCandidateRecord>,

    /// `None` only when there are no candidates
    pub statistics: Option<ScoreStatistics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub shortlister_version: String,
    pub job_file: String,
    pub model: String,
    pub processing_time_ms: u64,
    pub total_candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
    pub distribution: ScoreDistribution,
}

/// Candidate counts per score tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub excellent: usize,
    pub good: usize,
    pub average: usize,
    pub poor: usize,
}

/// Display tier of a final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTier {
    /// 80 and above
    Excellent,
    /// 60 to 79
    Good,
    /// 40 to 59
    Average,
    /// Below 40
    Poor,
}

impl ScoreTier {
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreTier::Excellent
        } else if score >= 60.0 {
            ScoreTier::Good
        } else if score >= 40.0 {
            ScoreTier::Average
        } else {
            ScoreTier::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent",
            ScoreTier::Good => "Good",
            ScoreTier::Average => "Average",
            ScoreTier::Poor => "Poor",
        }
    }

    pub fn range(self) -> &'static str {
        match self {
            ScoreTier::Excellent => "80-100%",
            ScoreTier::Good => "60-79%",
            ScoreTier::Average => "40-59%",
            ScoreTier::Poor => "0-39%",
        }
    }
}

impl ScoreStatistics {
    pub fn from_candidates(candidates: &[ValidatedCandidateRecord]) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }

        let scores = candidates.iter().map(|c| c.score);
        let average = scores.clone().sum::<f64>() / candidates.len() as f64;
        let highest = scores.clone().fold(f64::MIN, f64::max);
        let lowest = scores.clone().fold(f64::MAX, f64::min);

        let mut distribution = ScoreDistribution::default();
        for score in scores {
            match ScoreTier::for_score(score) {
                ScoreTier::Excellent => distribution.excellent += 1,
                ScoreTier::Good => distribution.good += 1,
                ScoreTier::Average => distribution.average += 1,
                ScoreTier::Poor => distribution.poor += 1,
            }
        }

        Some(Self {
            average,
            highest,
            lowest,
            distribution,
        })
    }
}

impl ShortlistReport {
    pub fn new(shortlist: Shortlist, job_file: &str, model: &str, processing_time_ms: u64) -> Self {
        let statistics = ScoreStatistics::from_candidates(&shortlist.candidates);
        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                shortlister_version: env!("CARGO_PKG_VERSION").to_string(),
                job_file: job_file.to_string(),
                model: model.to_string(),
                processing_time_ms,
                total_candidates: shortlist.candidates.len(),
            },
            requirements: shortlist.requirements,
            candidates: shortlist.candidates,
            statistics,
        }
    }

    /// Candidates at or above `threshold`, with their 1-based rank
    pub fn visible_candidates(&self, threshold: f64) -> Vec<(usize, &ValidatedCandidateRecord)> {
        self.candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.score >= threshold)
            .map(|(index, candidate)| (index + 1, candidate))
            .collect()
    }
}
