//! Grounds judge-claimed skills against the job's required skills

use log::debug;
use serde::{Deserialize, Serialize};

/// Claimed skills that survived validation, plus the match ratio.
///
/// `ratio` is exactly `0.0` when there were no required skills. That value
/// means "nothing to calibrate against", not "no skills matched".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillValidation {
    pub validated: Vec<String>,
    pub ratio: f64,
}

/// Keep each claimed skill that equals, contains, or is contained in a
/// required skill (case-insensitive, trimmed).
///
/// Accepted skills keep their claimed spelling and order. Duplicates are kept.
/// With no required skills the claimed list passes through unchanged.
pub fn validate<C, R>(claimed: &[C], required: &[R]) -> SkillValidation
where
    C: AsRef<str>,
    R: AsRef<str>,
{
    if required.is_empty() {
        debug!("No required skills, skill validation skipped");
        return SkillValidation {
            validated: claimed.iter().map(|s| s.as_ref().to_string()).collect(),
            ratio: 0.0,
        };
    }

    let required_normalized: Vec<String> = required
        .iter()
        .map(|skill| normalize(skill.as_ref()))
        .collect();

    let mut validated = Vec::new();
    for skill in claimed {
        let skill = skill.as_ref();
        match find_grounding(&normalize(skill), &required_normalized) {
            Some(index) => {
                debug!("Valid match: '{}' matches '{}'", skill, required[index].as_ref());
                validated.push(skill.to_string());
            }
            None => debug!("Invalid match removed: '{}' (not in required skills)", skill),
        }
    }

    let ratio = validated.len() as f64 / required.len() as f64;
    debug!(
        "Validated skills: {}/{} = {:.1}%",
        validated.len(),
        required.len(),
        ratio * 100.0
    );

    SkillValidation { validated, ratio }
}

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Index of the first required skill the claimed skill is grounded in.
/// A blank string is a substring of anything, so it matches on either side.
fn find_grounding(claimed: &str, required: &[String]) -> Option<usize> {
    required
        .iter()
        .position(|req| claimed == req || req.contains(claimed) || claimed.contains(req.as_str()))
}
