//! Batch pipeline: judge every resume concurrently, then rank.
//!
//! A failure for one candidate never aborts the batch. Unreadable resumes and
//! failed judge calls both become default judgments that still get ranked.

use crate::error::Result;
use crate::llm::Judge;
use crate::processing::candidate::{
    CandidateSource, RawCandidateJudgment, RequirementSet, ValidatedCandidateRecord,
};
use crate::processing::ranker::CandidateRanker;
use indicatif::ProgressBar;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A resume file and its extracted text, `None` when extraction failed
#[derive(Debug, Clone)]
pub struct CandidateDocument {
    pub path: PathBuf,
    pub text: Option<String>,
}

impl CandidateDocument {
    pub fn new(path: impl Into<PathBuf>, text: Option<String>) -> Self {
        Self {
            path: path.into(),
            text,
        }
    }

    fn source(&self) -> CandidateSource {
        CandidateSource::new(&self.path, self.text.clone().unwrap_or_default())
    }
}

/// Requirements used and the ranked candidates
#[derive(Debug, Clone)]
pub struct Shortlist {
    pub requirements: RequirementSet,
    pub candidates: Vec<ValidatedCandidateRecord>,
}

pub struct Shortlister {
    judge: Arc<dyn Judge>,
    ranker: CandidateRanker,
    concurrency: usize,
}

impl Shortlister {
    pub fn new(judge: Arc<dyn Judge>, ranker: CandidateRanker, concurrency: usize) -> Self {
        Self {
            judge,
            ranker,
            concurrency: concurrency.max(1),
        }
    }

    pub fn model_name(&self) -> &str {
        self.judge.model_name()
    }

    /// Requirements for a job description, or the empty default when parsing fails
    pub async fn analyze_job(&self, job_text: &str) -> RequirementSet {
        match self.judge.parse_requirements(job_text).await {
            Ok(requirements) => {
                info!(
                    "Job '{}' has {} required skills",
                    requirements.job_title,
                    requirements.required_skills.len()
                );
                requirements
            }
            Err(e) => {
                warn!("Error parsing job description, continuing without requirements: {}", e);
                RequirementSet::default()
            }
        }
    }

    /// One judgment per document, in document order
    pub async fn judge_candidates(
        &self,
        documents: &[CandidateDocument],
        requirements: &RequirementSet,
        progress: Option<&ProgressBar>,
    ) -> Vec<RawCandidateJudgment> {
        let sources: Vec<CandidateSource> = documents.iter().map(CandidateDocument::source).collect();
        let requirements = Arc::new(requirements.clone());
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, (document, source)) in documents.iter().zip(&sources).enumerate() {
            if document.text.is_none() {
                warn!("No text for {}, using default analysis", source.path);
                continue;
            }

            let judge = Arc::clone(&self.judge);
            let requirements = Arc::clone(&requirements);
            let semaphore = Arc::clone(&semaphore);
            let source = source.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let judgment = match judge.judge(&source, &requirements).await {
                    Ok(judgment) => judgment,
                    Err(e) => {
                        warn!("Error analyzing {}: {}", source.path, e);
                        RawCandidateJudgment::failed(source)
                    }
                };
                (index, judgment)
            });
        }

        let mut slots: Vec<Option<RawCandidateJudgment>> = vec![None; documents.len()];
        if let Some(bar) = progress {
            bar.inc((documents.len() - tasks.len()) as u64);
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, judgment)) => slots[index] = Some(judgment),
                Err(e) => warn!("Analysis task failed: {}", e),
            }
            if let Some(bar) = progress {
                bar.inc(1);
            }
        }

        slots
            .into_iter()
            .zip(sources)
            .map(|(slot, source)| slot.unwrap_or_else(|| RawCandidateJudgment::failed(source)))
            .collect()
    }

    /// Parse the job, judge every document and rank the results
    pub async fn shortlist(
        &self,
        job_text: &str,
        documents: &[CandidateDocument],
        progress: Option<&ProgressBar>,
    ) -> Result<Shortlist> {
        let requirements = self.analyze_job(job_text).await;
        let judgments = self.judge_candidates(documents, &requirements, progress).await;
        let candidates = self.ranker.rank(&judgments, &requirements)?;

        Ok(Shortlist {
            requirements,
            candidates,
        })
    }
}
