//! Judgment collaborator: job parsing and per-resume judgment over a chat API

use crate::config::LlmConfig;
use crate::error::{Result, ShortlisterError};
use crate::llm::client::{ChatClient, ChatPrompt};
use crate::llm::jitter::{tag_resume, Jitter, NoJitter, RandomJitter};
use crate::llm::prompts::PromptTemplates;
use crate::llm::response;
use crate::processing::candidate::{CandidateSource, RawCandidateJudgment, RequirementSet};
use async_trait::async_trait;
use log::debug;
use std::time::Instant;

/// Environment variable read when no key is configured
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// External semantic comparison service. Its output is never trusted as-is.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Extract requirements from a job description
    async fn parse_requirements(&self, job_text: &str) -> Result<RequirementSet>;

    /// Judge one resume against the requirements
    async fn judge(
        &self,
        source: &CandidateSource,
        requirements: &RequirementSet,
    ) -> Result<RawCandidateJudgment>;

    fn model_name(&self) -> &str;
}

pub struct OpenAiJudge {
    client: ChatClient,
    prompts: PromptTemplates,
    jitter: Box<dyn Jitter>,
    temperature: f64,
}

impl OpenAiJudge {
    pub fn new(config: &LlmConfig, jitter: Box<dyn Jitter>) -> Result<Self> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        Ok(Self {
            client: ChatClient::new(config, api_key)?,
            prompts: PromptTemplates::default(),
            jitter,
            temperature: config.temperature,
        })
    }

    /// Judge configured from `llm.jitter`
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let jitter: Box<dyn Jitter> = if config.jitter {
            Box::new(RandomJitter)
        } else {
            Box::new(NoJitter)
        };
        Self::new(config, jitter)
    }
}

#[async_trait]
impl Judge for OpenAiJudge {
    async fn parse_requirements(&self, job_text: &str) -> Result<RequirementSet> {
        let user = self.prompts.render_job_parse(job_text);
        let reply = self
            .client
            .complete(&ChatPrompt {
                system: &self.prompts.job_system,
                user: &user,
                temperature: self.temperature,
            })
            .await?;

        let requirements = response::parse_requirements(&reply)?;
        debug!(
            "Parsed job '{}' with {} required skills",
            requirements.job_title,
            requirements.required_skills.len()
        );
        Ok(requirements)
    }

    async fn judge(
        &self,
        source: &CandidateSource,
        requirements: &RequirementSet,
    ) -> Result<RawCandidateJudgment> {
        let start = Instant::now();
        let resume = tag_resume(self.jitter.as_ref(), &source.resume_text);
        let user = self.prompts.render_resume_judgment(&resume, requirements)?;

        let reply = self
            .client
            .complete(&ChatPrompt {
                system: &self.prompts.judge_system,
                user: &user,
                temperature: self.jitter.temperature(self.temperature),
            })
            .await?;

        let claims = response::parse_judgment(&reply)?;
        debug!(
            "Judged {} in {}ms: raw score {:.1}%, {} claimed matching skills",
            source.fallback_id,
            start.elapsed().as_millis(),
            claims.matching_score,
            claims.matching_skills.len()
        );

        Ok(RawCandidateJudgment::new(source.clone(), claims))
    }

    fn model_name(&self) -> &str {
        self.client.model()
    }
}

/// Configured key, else the environment
pub fn resolve_api_key(configured: Option<&str>) -> Result<String> {
    configured
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty()))
        .ok_or_else(|| {
            ShortlisterError::Configuration(format!(
                "An API key is required: set llm.api_key in the config file or the {} environment variable",
                API_KEY_ENV
            ))
        })
}
