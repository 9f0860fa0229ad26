//! Turns raw judgments into calibrated records and orders them

use crate::error::{Result, ShortlisterError};
use crate::processing::candidate::{
    NameSource, RawCandidateJudgment, RequirementSet, ValidatedCandidateRecord,
};
use crate::processing::name_extractor::{NameExtractor, UNKNOWN_CANDIDATE};
use crate::processing::score_calibrator;
use crate::processing::skill_validator;
use log::{debug, info};

/// Names that leak from cached model responses and are never trusted
pub const DEFAULT_SENTINEL_NAMES: &[&str] = &["AVINASH"];

/// Claimed names this short are not treated as names
const MIN_CLAIMED_NAME_CHARS: usize = 3;

pub struct CandidateRanker {
    name_extractor: NameExtractor,
    sentinel_names: Vec<String>,
}

impl CandidateRanker {
    pub fn new() -> Result<Self> {
        Ok(Self {
            name_extractor: NameExtractor::new()?,
            sentinel_names: DEFAULT_SENTINEL_NAMES.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn with_sentinel_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sentinel_names = names
            .into_iter()
            .map(|name| name.into().to_uppercase())
            .filter(|name| !name.trim().is_empty())
            .collect();
        self
    }

    /// Validate, calibrate and name every judgment, then sort by score.
    ///
    /// The output always has one record per input. Equal scores keep their
    /// input order.
    pub fn rank(
        &self,
        judgments: &[RawCandidateJudgment],
        requirements: &RequirementSet,
    ) -> Result<Vec<ValidatedCandidateRecord>> {
        if judgments.is_empty() {
            return Err(ShortlisterError::InvalidInput(
                "No candidates to rank".to_string(),
            ));
        }

        let records: Vec<ValidatedCandidateRecord> = judgments
            .iter()
            .map(|judgment| self.evaluate(judgment, requirements))
            .collect();

        info!("Ranked {} candidates", records.len());
        Ok(sort_by_score(records))
    }

    /// Calibrated record for a single judgment
    pub fn evaluate(
        &self,
        judgment: &RawCandidateJudgment,
        requirements: &RequirementSet,
    ) -> ValidatedCandidateRecord {
        let claims = &judgment.claims;
        let validation =
            skill_validator::validate(&claims.matching_skills, &requirements.required_skills);
        let calibration = score_calibrator::explain(
            claims.matching_score,
            validation.ratio,
            requirements.has_requirements(),
        );
        let (name, name_source) = self.resolve_name(judgment);

        debug!(
            "Candidate '{}' ({}): {:.1}% -> {:.1}%",
            name, name_source, claims.matching_score, calibration.score
        );

        ValidatedCandidateRecord {
            name,
            name_source,
            score: calibration.score,
            raw_score: claims.matching_score,
            band: calibration.band,
            adjustment: calibration.adjustment,
            matching_skills: validation.validated,
            match_ratio: validation.ratio.clamp(0.0, 1.0),
            key_skills: claims.key_skills.clone(),
            missing_skills: claims.missing_skills.clone(),
            summary: claims.summary.clone(),
            strengths: claims.strengths.clone(),
            weaknesses: claims.weaknesses.clone(),
            source_path: judgment.source.path.clone(),
        }
    }

    /// Text extraction first, then the judge's claim, then the file identifier
    pub fn resolve_name(&self, judgment: &RawCandidateJudgment) -> (String, NameSource) {
        let fallback_id = judgment.source.fallback_id.as_str();

        if let Some(extracted) = self.name_extractor.find_name(&judgment.source.resume_text) {
            if extracted != fallback_id {
                return (extracted, NameSource::TextExtraction);
            }
        }

        let claimed = judgment.claims.candidate_name.trim();
        if self.is_trusted_claim(claimed) {
            return (claimed.to_string(), NameSource::Judge);
        }

        if fallback_id.trim().is_empty() {
            (UNKNOWN_CANDIDATE.to_string(), NameSource::Fallback)
        } else {
            (fallback_id.to_string(), NameSource::Fallback)
        }
    }

    fn is_trusted_claim(&self, claimed: &str) -> bool {
        if claimed.chars().count() < MIN_CLAIMED_NAME_CHARS || claimed == UNKNOWN_CANDIDATE {
            return false;
        }

        let upper = claimed.to_uppercase();
        !self
            .sentinel_names
            .iter()
            .any(|sentinel| upper.contains(sentinel.as_str()))
    }
}

impl Default for CandidateRanker {
    fn default() -> Self {
        Self::new().expect("Failed to create default candidate ranker")
    }
}

/// Stable sort, highest score first
pub fn sort_by_score(mut records: Vec<ValidatedCandidateRecord>) -> Vec<ValidatedCandidateRecord> {
    records.sort_by(|a, b| b.score.total_cmp(&a.score));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::candidate::{CandidateSource, JudgmentClaims};
    use crate::processing::score_calibrator::{Adjustment, ScoreBand};
    use std::path::Path;

    fn judgment(file: &str, text: &str, name: &str, score: f64, skills: &[&str]) -> RawCandidateJudgment {
        let mut claims = JudgmentClaims::failed();
        claims.candidate_name = name.to_string();
        claims.matching_score = score;
        claims.matching_skills = skills.iter().map(|s| s.to_string()).collect();
        claims.summary = format!("summary for {}", file);
        RawCandidateJudgment::new(CandidateSource::new(Path::new(file), text), claims)
    }

    fn twenty_skills() -> RequirementSet {
        RequirementSet::with_required_skills((0..20).map(|i| format!("skill{:02}", i)))
    }

    fn skills(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("skill{:02}", i)).collect()
    }

    fn to_refs(v: &[String]) -> Vec<&str> {
        v.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_rank_orders_by_calibrated_score() {
        let ranker = CandidateRanker::new().unwrap();
        let requirements = twenty_skills();
        let s19 = skills(19);
        let s2 = skills(2);
        let s13 = skills(13);

        let judgments = vec![
            judgment("a.pdf", "", "Alice Adams", 95.0, &to_refs(&s19)),
            judgment("b.pdf", "", "Bob Brown", 40.0, &to_refs(&s2)),
            judgment("c.pdf", "", "Carol Cole", 70.0, &to_refs(&s13)),
        ];

        let ranked = ranker.rank(&judgments, &requirements).unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].name, "Alice Adams");
        assert_eq!(ranked[1].name, "Carol Cole");
        assert_eq!(ranked[2].name, "Bob Brown");

        assert!((ranked[0].score - 92.5).abs() < 1e-9);
        assert_eq!(ranked[0].adjustment, Adjustment::OutstandingBoost);
        assert_eq!(ranked[1].score, 70.0);
        assert_eq!(ranked[1].band, Some(ScoreBand::Good));
        assert!((ranked[2].score - 11.0).abs() < 1e-9);
        assert!((ranked[2].match_ratio - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranker = CandidateRanker::new().unwrap();
        let requirements = RequirementSet::default();
        let judgments = vec![
            judgment("first.pdf", "", "", 50.0, &[]),
            judgment("second.pdf", "", "", 80.0, &[]),
            judgment("third.pdf", "", "", 50.0, &[]),
        ];

        let ranked = ranker.rank(&judgments, &requirements).unwrap();
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first", "third"]);
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let ranker = CandidateRanker::new().unwrap();
        let result = ranker.rank(&[], &RequirementSet::default());
        assert!(matches!(result, Err(ShortlisterError::InvalidInput(_))));
    }

    #[test]
    fn test_failed_judgments_are_kept() {
        let ranker = CandidateRanker::new().unwrap();
        let requirements = RequirementSet::with_required_skills(["Rust", "Tokio"]);
        let judgments: Vec<RawCandidateJudgment> = (0..4)
            .map(|i| {
                RawCandidateJudgment::failed(CandidateSource::new(
                    Path::new(&format!("resume_{}.docx", i)),
                    "",
                ))
            })
            .collect();

        let ranked = ranker.rank(&judgments, &requirements).unwrap();
        assert_eq!(ranked.len(), judgments.len());
        for record in &ranked {
            assert_eq!(record.score, 0.0);
            assert!(record.matching_skills.is_empty());
            assert_eq!(record.name_source, NameSource::Fallback);
        }
        assert_eq!(ranked[0].name, "resume_0");
    }

    #[test]
    fn test_name_from_text_wins() {
        let ranker = CandidateRanker::new().unwrap();
        let j = judgment("cv_17.pdf", "Jane Q. Public\nData Engineer", "Someone Else", 50.0, &[]);
        assert_eq!(
            ranker.resolve_name(&j),
            ("Jane Q. Public".to_string(), NameSource::TextExtraction)
        );
    }

    #[test]
    fn test_name_from_judge_when_text_has_none() {
        let ranker = CandidateRanker::new().unwrap();
        let j = judgment("cv_17.pdf", "CURRICULUM VITAE", "  Priya Raman ", 50.0, &[]);
        assert_eq!(
            ranker.resolve_name(&j),
            ("Priya Raman".to_string(), NameSource::Judge)
        );
    }

    #[test]
    fn test_untrusted_claims_fall_back_to_file() {
        let ranker = CandidateRanker::new().unwrap();
        for claimed in ["", "Al", "Unknown Candidate", "Avinash Kumar"] {
            let j = judgment("/tmp/cv_17.pdf", "RESUME", claimed, 50.0, &[]);
            assert_eq!(
                ranker.resolve_name(&j),
                ("cv_17".to_string(), NameSource::Fallback),
                "claimed name {:?} should not be trusted",
                claimed
            );
        }
    }

    #[test]
    fn test_custom_sentinels() {
        let ranker = CandidateRanker::new()
            .unwrap()
            .with_sentinel_names(["john doe"]);
        let j = judgment("x.pdf", "", "John Doe", 50.0, &[]);
        assert_eq!(ranker.resolve_name(&j).1, NameSource::Fallback);

        let j = judgment("x.pdf", "", "Avinash Kumar", 50.0, &[]);
        assert_eq!(ranker.resolve_name(&j).1, NameSource::Judge);
    }

    #[test]
    fn test_ungrounded_skills_are_dropped() {
        let ranker = CandidateRanker::new().unwrap();
        let requirements = RequirementSet::with_required_skills(["LangChain", "OpenAI API"]);
        let j = judgment("x.pdf", "", "Some Body", 70.0, &["Python", "LangChain"]);

        let record = ranker.evaluate(&j, &requirements);
        assert_eq!(record.matching_skills, vec!["LangChain".to_string()]);
        assert_eq!(record.match_ratio, 0.5);
        assert_eq!(record.score, 65.0);
        assert_eq!(record.raw_score, 70.0);
        assert_eq!(record.summary, "summary for x.pdf");
    }

    #[test]
    fn test_no_requirements_clamps_only() {
        let ranker = CandidateRanker::new().unwrap();
        let j = judgment("x.pdf", "", "Some Body", 130.0, &["X"]);
        let record = ranker.evaluate(&j, &RequirementSet::default());
        assert_eq!(record.score, 100.0);
        assert_eq!(record.band, None);
        assert_eq!(record.matching_skills, vec!["X".to_string()]);
        assert_eq!(record.match_ratio, 0.0);
    }
}
