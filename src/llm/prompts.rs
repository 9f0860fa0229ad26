//! Prompt templates for job parsing and resume judgment

use crate::error::Result;
use crate::processing::candidate::RequirementSet;

/// Prompt templates with `{job}`, `{requirements}` and `{resume}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub job_system: String,
    pub job_parse: String,
    pub judge_system: String,
    pub resume_judgment: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            job_system: JOB_SYSTEM_PROMPT.to_string(),
            job_parse: JOB_PARSE_TEMPLATE.to_string(),
            judge_system: JUDGE_SYSTEM_PROMPT.to_string(),
            resume_judgment: RESUME_JUDGMENT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_job_parse(&self, job_text: &str) -> String {
        self.job_parse.replace("{job}", job_text)
    }

    /// Requirements are embedded as pretty-printed JSON
    pub fn render_resume_judgment(
        &self,
        resume_text: &str,
        requirements: &RequirementSet,
    ) -> Result<String> {
        let requirements_json = serde_json::to_string_pretty(requirements)?;
        Ok(self
            .resume_judgment
            .replace("{requirements}", &requirements_json)
            .replace("{resume}", resume_text))
    }
}

const JOB_SYSTEM_PROMPT: &str =
    "You are an expert HR analyst. Extract job requirements accurately and return only valid JSON.";

const JOB_PARSE_TEMPLATE: &str = r#"Analyze the following job description and extract key information in JSON format:

Job Description:
{job}

Please extract and return the following information in JSON format:
{
    "job_title": "extracted job title",
    "required_skills": ["list", "of", "required", "technical", "skills"],
    "preferred_skills": ["list", "of", "preferred", "skills"],
    "experience_level": "junior/mid/senior level",
    "years_of_experience": "number of years required",
    "education_requirements": ["degree", "requirements"],
    "responsibilities": ["key", "job", "responsibilities"],
    "industry": "industry sector",
    "key_requirements": ["most", "important", "requirements"]
}

Only return valid JSON without any additional text or explanation."#;

const JUDGE_SYSTEM_PROMPT: &str = "You are an expert recruiter analyzing resumes. \
Extract candidate names EXACTLY from the current resume text. \
For matching_skills, ONLY include skills that are EXPLICITLY listed in the required_skills array. \
Do NOT count generic programming skills unless they are specifically in the required_skills list. \
Score based on TRUE required skill matches: 85-100 for 90%+ matches, 75-90 for 80%+ matches, \
60-80 for 60%+ matches, 20-40 for poor matches.";

const RESUME_JUDGMENT_TEMPLATE: &str = r#"Analyze the following resume against the job requirements and provide a detailed assessment:

Job Requirements:
{requirements}

Resume:
{resume}

STEP 1: Extract the candidate's name from the FIRST FEW LINES of the resume text.
STEP 2: Review the required_skills list and identify ONLY the skills from this list that the candidate has.
STEP 3: For each required skill, check if the candidate has EXACT or equivalent experience.
STEP 4: Count ONLY the required skills that match and ignore all other skills.
STEP 5: Calculate the score based on required skill matches.

IMPORTANT: Extract the candidate name EXACTLY as written in THIS resume. Do NOT use any previously seen names.

Return the following information in JSON format:
{
    "candidate_name": "EXACT name from THIS resume",
    "matching_score": 25.5,
    "key_skills": ["all", "technical", "skills", "found", "in", "resume"],
    "matching_skills": ["ONLY skills that EXACTLY or CLOSELY match required_skills"],
    "missing_skills": ["required", "skills", "not", "found", "in", "resume"],
    "summary": "brief summary focusing on skill gaps and matches",
    "strengths": ["key", "strengths", "relevant", "to", "job"],
    "weaknesses": ["specific", "skill", "gaps"],
    "experience_match": true,
    "education_match": false
}

Scoring criteria:
- Technical skills match (70%): share of required technical skills the candidate has
- Experience level match (20%): years of experience and seniority
- Education match (5%)
- Industry experience (5%)

Return matching_score as a number between 0 and 100.
Only return valid JSON without any additional text."#;
