//! Candidate and job requirement records flowing through the shortlisting pipeline

use crate::processing::name_extractor::{fallback_id_for, UNKNOWN_CANDIDATE};
use crate::processing::score_calibrator::{Adjustment, ScoreBand};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Summary text used when the judge could not produce an analysis
pub const FAILED_ANALYSIS_SUMMARY: &str = "Error occurred during analysis";

/// Job requirements extracted from a job description.
///
/// Only `required_skills` drives validation and calibration. Every other field
/// is context passed through to prompts and reports untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    pub job_title: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience_level: String,
    pub years_of_experience: String,
    pub education_requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub industry: String,
    pub key_requirements: Vec<String>,
}

impl Default for RequirementSet {
    fn default() -> Self {
        Self {
            job_title: "Unknown".to_string(),
            required_skills: Vec::new(),
            preferred_skills: Vec::new(),
            experience_level: "Not specified".to_string(),
            years_of_experience: "Not specified".to_string(),
            education_requirements: Vec::new(),
            responsibilities: Vec::new(),
            industry: "Not specified".to_string(),
            key_requirements: Vec::new(),
        }
    }
}

impl RequirementSet {
    pub fn with_required_skills<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_skills: skills.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Whether calibration can be banded against a skill ratio
    pub fn has_requirements(&self) -> bool {
        !self.required_skills.is_empty()
    }
}

/// Where a candidate came from and the text the judge saw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSource {
    pub path: String,
    pub fallback_id: String,
    pub resume_text: String,
}

impl CandidateSource {
    pub fn new(path: &Path, resume_text: impl Into<String>) -> Self {
        Self {
            path: path.to_string_lossy().to_string(),
            fallback_id: fallback_id_for(path),
            resume_text: resume_text.into(),
        }
    }
}

/// Fields claimed by the external judge. None of them is trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentClaims {
    pub candidate_name: String,
    pub matching_score: f64,
    pub key_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub experience_match: Option<bool>,
    pub education_match: Option<bool>,
}

impl JudgmentClaims {
    /// Safe default substituted when the judge fails for a candidate
    pub fn failed() -> Self {
        Self {
            candidate_name: String::new(),
            matching_score: 0.0,
            key_skills: Vec::new(),
            matching_skills: Vec::new(),
            missing_skills: Vec::new(),
            summary: FAILED_ANALYSIS_SUMMARY.to_string(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            experience_match: None,
            education_match: None,
        }
    }
}

/// Untrusted judgment for one candidate, consumed once by the ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidateJudgment {
    pub source: CandidateSource,
    pub claims: JudgmentClaims,
}

impl RawCandidateJudgment {
    pub fn new(source: CandidateSource, claims: JudgmentClaims) -> Self {
        Self { source, claims }
    }

    pub fn failed(source: CandidateSource) -> Self {
        Self::new(source, JudgmentClaims::failed())
    }
}

/// How the final candidate name was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameSource {
    TextExtraction,
    Judge,
    Fallback,
}

impl std::fmt::Display for NameSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameSource::TextExtraction => write!(f, "text extraction"),
            NameSource::Judge => write!(f, "AI extraction"),
            NameSource::Fallback => write!(f, "filename fallback"),
        }
    }
}

/// Calibrated, immutable output of the ranking pipeline.
///
/// `score` is always within `[0, 100]` and `match_ratio` within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedCandidateRecord {
    pub name: String,
    pub name_source: NameSource,
    pub score: f64,
    pub raw_score: f64,
    pub band: Option<ScoreBand>,
    pub adjustment: Adjustment,
    pub matching_skills: Vec<String>,
    pub match_ratio: f64,
    pub key_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub source_path: String,
}

impl ValidatedCandidateRecord {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNKNOWN_CANDIDATE
        } else {
            &self.name
        }
    }
}
