//! Integration tests for the resume shortlister

use async_trait::async_trait;
use resume_shortlister::config::OutputFormat;
use resume_shortlister::error::{Result, ShortlisterError};
use resume_shortlister::input::{collect_resume_paths, InputManager};
use resume_shortlister::llm::Judge;
use resume_shortlister::output::formatter::save_report_to_file;
use resume_shortlister::output::{DisplayOptions, ReportGenerator, ShortlistReport};
use resume_shortlister::processing::candidate::{
    CandidateSource, JudgmentClaims, NameSource, RawCandidateJudgment, RequirementSet,
};
use resume_shortlister::processing::name_extractor::NameExtractor;
use resume_shortlister::processing::ranker::CandidateRanker;
use resume_shortlister::processing::score_calibrator::calibrate;
use resume_shortlister::processing::shortlister::{CandidateDocument, Shortlister};
use resume_shortlister::processing::skill_validator::validate;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const TEXT_RESUME: &str = "Jane Q. Public\nBackend Engineer\nSkills: Rust, Tokio, PostgreSQL\n";
const MARKDOWN_RESUME: &str = "# Raj Patel\n\n**Platform Engineer**\n\n## Skills\n\n- Rust\n- Kubernetes & Docker\n";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Minimal Word package: body paragraphs plus a one-row table
fn write_docx(dir: &Path, name: &str, paragraphs: &[&str], cells: &[&str]) -> PathBuf {
    let paragraph = |text: &str| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", text);
    let body: String = paragraphs.iter().map(|p| paragraph(p)).collect();
    let row: String = cells
        .iter()
        .map(|c| format!("<w:tc>{}</w:tc>", paragraph(c)))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:tbl><w:tr>{}</w:tr></w:tbl></w:body></w:document>"#,
        body, row
    );

    let path = dir.join(name);
    let mut package = zip::ZipWriter::new(fs::File::create(&path).unwrap());
    let options = zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    package.start_file("[Content_Types].xml", options).unwrap();
    package
        .write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();
    package.start_file("word/document.xml", options).unwrap();
    package.write_all(xml.as_bytes()).unwrap();
    package.finish().unwrap();
    path
}

/// Claims keyed by file stem; unknown stems fail like a broken API call
struct ScriptedJudge {
    claims: HashMap<String, (String, f64, Vec<String>)>,
}

impl ScriptedJudge {
    fn new() -> Self {
        Self {
            claims: HashMap::new(),
        }
    }

    fn with(mut self, stem: &str, name: &str, score: f64, skills: &[&str]) -> Self {
        self.claims.insert(
            stem.to_string(),
            (
                name.to_string(),
                score,
                skills.iter().map(|s| s.to_string()).collect(),
            ),
        );
        self
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    async fn parse_requirements(&self, job_text: &str) -> Result<RequirementSet> {
        let mut requirements = RequirementSet::with_required_skills(["Rust", "Tokio", "PostgreSQL", "AWS"]);
        requirements.job_title = job_text.lines().next().unwrap_or_default().to_string();
        Ok(requirements)
    }

    async fn judge(
        &self,
        source: &CandidateSource,
        _requirements: &RequirementSet,
    ) -> Result<RawCandidateJudgment> {
        let (name, score, skills) = self
            .claims
            .get(&source.fallback_id)
            .cloned()
            .ok_or_else(|| ShortlisterError::Network("connection reset".to_string()))?;
        let mut claims = JudgmentClaims::failed();
        claims.candidate_name = name;
        claims.matching_score = score;
        claims.matching_skills = skills;
        claims.summary = format!("Assessment of {}", source.fallback_id);
        Ok(RawCandidateJudgment::new(source.clone(), claims))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "jane.txt", TEXT_RESUME);

    let mut manager = InputManager::new();
    let text = manager.extract_text(&path).await.unwrap();
    assert!(text.contains("Jane Q. Public"));
    assert!(text.contains("PostgreSQL"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "raj.md", MARKDOWN_RESUME);

    let mut manager = InputManager::new();
    let text = manager.extract_text(&path).await.unwrap();
    assert!(text.contains("Raj Patel"));
    assert!(text.contains("Kubernetes & Docker"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "jane.txt", TEXT_RESUME);

    let mut manager = InputManager::new();
    let first = manager.extract_text(&path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    fs::remove_file(&path).unwrap();
    let second = manager.extract_text(&path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_text_extraction_from_docx() {
    let dir = TempDir::new().unwrap();
    let path = write_docx(
        dir.path(),
        "maria.docx",
        &["Maria Gonzalez", "", "Site Reliability Engineer", "R&amp;D lead"],
        &["Rust", "  ", "Kubernetes"],
    );

    let mut manager = InputManager::new();
    let text = manager.extract_text(&path).await.unwrap();
    assert_eq!(
        text,
        "Maria Gonzalez\nSite Reliability Engineer\nR&D lead\nRust\nKubernetes"
    );

    let extractor = NameExtractor::new().unwrap();
    assert_eq!(extractor.extract(&text, "maria"), "Maria Gonzalez");
}

#[tokio::test]
async fn test_broken_word_document_is_an_extraction_error() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "legacy.docx", "not really a docx");

    let mut manager = InputManager::new();
    let result = manager.extract_text(&path).await;
    assert!(matches!(result, Err(ShortlisterError::DocxExtraction(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("/definitely/not/here.txt")).await;
    assert!(matches!(result, Err(ShortlisterError::InvalidInput(_))));
}

#[test]
fn test_directory_expansion_is_sorted_and_filtered() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.txt", TEXT_RESUME);
    write(dir.path(), "a.pdf", "%PDF");
    write(dir.path(), "notes.xyz", "ignore me");
    fs::create_dir(dir.path().join("nested")).unwrap();
    write(&dir.path().join("nested"), "c.txt", TEXT_RESUME);

    let paths = collect_resume_paths(&[dir.path().to_path_buf()], 50).unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.pdf", "b.txt"]);

    let limited = collect_resume_paths(&[dir.path().to_path_buf()], 1).unwrap();
    assert_eq!(limited.len(), 1);
}

#[test]
fn test_skill_validation_examples() {
    let result = validate(&["Python", "LangChain"], &["LangChain", "OpenAI API"]);
    assert_eq!(result.validated, vec!["LangChain".to_string()]);
    assert_eq!(result.ratio, 0.5);

    let empty: [&str; 0] = [];
    let result = validate(&empty, &["A", "B"]);
    assert!(result.validated.is_empty());
    assert_eq!(result.ratio, 0.0);

    let result = validate(&["X"], &empty);
    assert_eq!(result.ratio, 0.0);
    assert_eq!(calibrate(42.0, result.ratio, false), 42.0);
}

#[test]
fn test_calibration_properties() {
    let mut previous = 0.0;
    for step in 0..=20 {
        let ratio = 0.9 + step as f64 * 0.005;
        let score = calibrate(10.0, ratio, true);
        assert!((85.0..=100.0).contains(&score));
        assert!(score >= previous);
        previous = score;
    }

    for raw in [-20.0, 0.0, 55.5, 100.0, 250.0] {
        for ratio in [0.0, 0.5, 1.0] {
            assert_eq!(calibrate(raw, ratio, false), raw.clamp(0.0, 100.0));
        }
    }

    assert!(calibrate(100.0, 0.05, true) <= 11.0);
    assert!(calibrate(0.0, 0.85, true) >= 75.0);
    assert!(calibrate(100.0, 0.7, true) <= 80.0);
}

#[test]
fn test_name_extraction_examples() {
    let extractor = NameExtractor::new().unwrap();
    assert_eq!(
        extractor.extract("John A. Smith\nSenior Engineer\nSkills: Python, SQL", "resume_007"),
        "John A. Smith"
    );
    assert_eq!(
        extractor.extract("PROFESSIONAL SUMMARY\nResults-driven...", "resume_008"),
        "resume_008"
    );
}

#[test]
fn test_rank_length_matches_input_when_all_malformed() {
    let ranker = CandidateRanker::new().unwrap();
    let judgments: Vec<RawCandidateJudgment> = (0..5)
        .map(|i| {
            RawCandidateJudgment::failed(CandidateSource::new(
                Path::new(&format!("cv_{}.pdf", i)),
                "",
            ))
        })
        .collect();

    let ranked = ranker
        .rank(&judgments, &RequirementSet::with_required_skills(["Rust"]))
        .unwrap();
    assert_eq!(ranked.len(), judgments.len());
    assert!(ranked.iter().all(|r| r.score == 0.0));
}

#[tokio::test]
async fn test_end_to_end_shortlist() {
    let dir = TempDir::new().unwrap();
    let resumes = dir.path().join("resumes");
    fs::create_dir(&resumes).unwrap();
    write(&resumes, "jane.txt", TEXT_RESUME);
    write(&resumes, "raj.md", MARKDOWN_RESUME);
    write(&resumes, "ghost.txt", "RESUME\nEXPERIENCE\n");
    write(&resumes, "legacy.docx", "binary");

    let judge = ScriptedJudge::new()
        .with("jane", "Avinash", 88.0, &["Rust", "Tokio", "PostgreSQL", "Excel"])
        .with("raj", "Raj Patel", 95.0, &["Rust", "Kubernetes"])
        .with("ghost", "Avinash", 60.0, &[]);

    let paths = collect_resume_paths(&[resumes.clone()], 50).unwrap();
    assert_eq!(paths.len(), 4);

    let mut manager = InputManager::new();
    let mut documents = Vec::new();
    for path in paths {
        let text = manager.extract_text(&path).await.ok();
        documents.push(CandidateDocument::new(path, text));
    }

    let shortlister = Shortlister::new(Arc::new(judge), CandidateRanker::default(), 2);
    let shortlist = shortlister
        .shortlist("Backend Engineer\nWe need Rust.", &documents, None)
        .await
        .unwrap();

    assert_eq!(shortlist.requirements.job_title, "Backend Engineer");
    assert_eq!(shortlist.candidates.len(), 4);

    // Excel is not a required skill, so 3 of 4 ground and the Good band caps 88
    let jane = &shortlist.candidates[0];
    assert_eq!(jane.name, "Jane Q. Public");
    assert_eq!(jane.name_source, NameSource::TextExtraction);
    assert_eq!(jane.score, 80.0);
    assert!(!jane.matching_skills.contains(&"Excel".to_string()));

    let raj = &shortlist.candidates[1];
    assert_eq!(raj.matching_skills, vec!["Rust".to_string()]);
    assert_eq!(raj.score, 45.0);

    let ghost = shortlist
        .candidates
        .iter()
        .find(|c| c.source_path.ends_with("ghost.txt"))
        .unwrap();
    assert_eq!(ghost.name, "ghost");
    assert_eq!(ghost.name_source, NameSource::Fallback);
    assert_eq!(ghost.score, 11.0);

    let legacy = shortlist.candidates.last().unwrap();
    assert_eq!(legacy.name, "legacy");
    assert_eq!(legacy.score, 0.0);

    let scores: Vec<f64> = shortlist.candidates.iter().map(|c| c.score).collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));

    let report = ShortlistReport::new(shortlist, "job.txt", "scripted", 10);
    let generator = ReportGenerator::new(false, DisplayOptions::default());
    let content = generator.generate_report(&report, OutputFormat::Text).unwrap();

    let results = dir.path().join("out").join("resume_analysis_results.txt");
    save_report_to_file(&content, &results).unwrap();
    let saved = fs::read_to_string(&results).unwrap();
    assert!(saved.contains("Total Candidates Analyzed: 4"));
    assert!(saved.contains("RANK #1\n"));
    assert!(saved.contains("Candidate: Jane Q. Public"));
    assert!(saved.contains("Highest Score: 80.0%"));
}
