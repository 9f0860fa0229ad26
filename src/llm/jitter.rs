//! Per-request perturbation that keeps providers from serving cached replies

use rand::Rng;

/// Maximum temperature offset in either direction
pub const TEMPERATURE_JITTER: f64 = 0.05;

const ANALYSIS_ID_MIN: u32 = 1000;
const ANALYSIS_ID_MAX: u32 = 9999;

pub trait Jitter: Send + Sync {
    /// Temperature for one request, within `[0, 1]`
    fn temperature(&self, base: f64) -> f64;

    /// Identifier prepended to the resume, or `None` to leave it untouched
    fn analysis_id(&self) -> Option<u32>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn temperature(&self, base: f64) -> f64 {
        let offset = rand::thread_rng().gen_range(-TEMPERATURE_JITTER..=TEMPERATURE_JITTER);
        (base + offset).clamp(0.0, 1.0)
    }

    fn analysis_id(&self) -> Option<u32> {
        Some(rand::thread_rng().gen_range(ANALYSIS_ID_MIN..=ANALYSIS_ID_MAX))
    }
}

/// Deterministic requests
#[derive(Debug, Default, Clone, Copy)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn temperature(&self, base: f64) -> f64 {
        base.clamp(0.0, 1.0)
    }

    fn analysis_id(&self) -> Option<u32> {
        None
    }
}

/// Resume text as sent to the judge
pub fn tag_resume(jitter: &dyn Jitter, resume_text: &str) -> String {
    match jitter.analysis_id() {
        Some(id) => format!("[Analysis ID: {}]\n{}", id, resume_text),
        None => resume_text.to_string(),
    }
}
