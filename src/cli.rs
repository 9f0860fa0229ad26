//! CLI interface for the resume shortlister

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Extensions accepted for a job description
pub const JOB_EXTENSIONS: &[&str] = &["docx", "doc", "pdf", "txt", "md", "markdown"];

#[derive(Parser)]
#[command(name = "resume-shortlister")]
#[command(about = "AI-assisted resume shortlisting with calibrated, skill-grounded scores")]
#[command(long_about = "Rank a batch of resumes against a job description. Model judgments are \
grounded against the job's required skills and recalibrated before ranking.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank resumes against a job description
    Shortlist {
        /// Path to job description file (DOCX, PDF, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Resume files or directories containing them
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Output format: console, json, markdown, html, text
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file (defaults to the configured results file for text output)
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Number of resumes judged at once
        #[arg(long)]
        concurrency: Option<usize>,

        /// Disable temperature and prompt perturbation
        #[arg(long)]
        no_jitter: bool,

        /// Show raw scores, calibration and name sources
        #[arg(short, long)]
        detailed: bool,
    },

    /// Explain how a raw score is calibrated for a skill match ratio
    Calibrate {
        /// Raw score claimed by the judge
        #[arg(long, allow_negative_numbers = true)]
        raw: f64,

        /// Validated skills divided by required skills
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        ratio: f64,

        /// Treat the job as having no required skills
        #[arg(long)]
        no_requirements: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "analysis.concurrency")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
