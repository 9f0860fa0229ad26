//! Resume shortlister: rank resumes against a job description with calibrated scores

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_shortlister::cli::{self, Cli, Commands, ConfigAction, JOB_EXTENSIONS};
use resume_shortlister::config::{parse_output_format, Config, OutputFormat};
use resume_shortlister::input::{collect_resume_paths, InputManager};
use resume_shortlister::llm::OpenAiJudge;
use resume_shortlister::output::formatter::save_report_to_file;
use resume_shortlister::output::{DisplayOptions, ReportGenerator, ShortlistReport};
use resume_shortlister::processing::ranker::CandidateRanker;
use resume_shortlister::processing::score_calibrator;
use resume_shortlister::processing::shortlister::{CandidateDocument, Shortlister};
use resume_shortlister::{Result, ShortlisterError};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Shortlist {
            job,
            resumes,
            output,
            save,
            concurrency,
            no_jitter,
            detailed,
        } => {
            if let Some(format) = output {
                config.output.format = parse_output_format(&format)?;
            }
            if let Some(concurrency) = concurrency {
                config.analysis.concurrency = concurrency.max(1);
            }
            if no_jitter {
                config.llm.jitter = false;
            }
            run_shortlist(&config, &job, &resumes, save, detailed).await
        }

        Commands::Calibrate {
            raw,
            ratio,
            no_requirements,
        } => {
            let calibration = score_calibrator::explain(raw, ratio, !no_requirements);
            println!("🎯 Score calibration\n");
            println!("Raw score:   {:.1}%", raw);
            if no_requirements {
                println!("Skill match: no required skills");
            } else {
                println!("Skill match: {:.1}%", ratio * 100.0);
            }
            match calibration.band {
                Some(band) => println!(
                    "Band:        {} ({:.0}-{:.0}%)",
                    band,
                    band.min_score(),
                    band.max_allowed()
                ),
                None => println!("Band:        none"),
            }
            println!("Rule:        {}", calibration.adjustment);
            println!("Final score: {:.1}%", calibration.score);
            Ok(())
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                println!("LLM:");
                println!("  Model: {}", config.llm.model);
                println!("  Base URL: {}", config.llm.base_url);
                println!(
                    "  API key: {}",
                    if config.llm.api_key.is_some() { "configured" } else { "from environment" }
                );
                println!("  Max tokens: {}", config.llm.max_tokens);
                println!("  Temperature: {}", config.llm.temperature);
                println!("  Timeout: {}s, retries: {}", config.llm.timeout_secs, config.llm.max_retries);
                println!("  Jitter: {}", config.llm.jitter);
                println!("\nAnalysis:");
                println!("  Concurrency: {}", config.analysis.concurrency);
                println!("  Max resumes: {}", config.analysis.max_resumes);
                println!("  Min score threshold: {:.1}%", config.analysis.min_score_threshold);
                println!("  Sentinel names: {}", config.analysis.sentinel_names.join(", "));
                println!("\nOutput:");
                println!("  Format: {:?}", config.output.format);
                println!("  Colors: {}", config.output.color_output);
                println!(
                    "  Skills shown: {} matching, {} missing",
                    config.output.max_matching_skills_display, config.output.max_missing_skills_display
                );
                println!("  Results file: {}", config.output.results_file.display());
                Ok(())
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
                Ok(())
            }

            Some(ConfigAction::Set { key, value }) => {
                config.set_value(&key, &value)?;
                config.save_to(config_path)?;
                println!("✅ Set {} = {}", key, value);
                Ok(())
            }
        },
    }
}

async fn run_shortlist(
    config: &Config,
    job: &Path,
    resumes: &[PathBuf],
    save: Option<PathBuf>,
    detailed: bool,
) -> Result<()> {
    let start = Instant::now();

    cli::validate_file_extension(job, JOB_EXTENSIONS)
        .map_err(|e| ShortlisterError::InvalidInput(format!("Job description file: {}", e)))?;

    // Fail on a missing key before any file work
    let judge = OpenAiJudge::from_config(&config.llm)?;
    let ranker = CandidateRanker::new()?.with_sentinel_names(config.analysis.sentinel_names.iter().cloned());
    let shortlister = Shortlister::new(Arc::new(judge), ranker, config.analysis.concurrency);

    println!("🚀 Resume shortlisting");
    println!("💼 Job Description: {}", job.display());
    println!("🤖 Model: {}", shortlister.model_name());

    let mut input_manager = InputManager::new();
    let job_text = input_manager.extract_text(job).await?;

    let paths = collect_resume_paths(resumes, config.analysis.max_resumes)?;
    if paths.is_empty() {
        return Err(ShortlisterError::InvalidInput(
            "No resume files found in the given paths".to_string(),
        ));
    }
    println!("📂 Found {} resumes", paths.len());

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let text = match input_manager.extract_text(&path).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                warn!("No text extracted from {}", path.display());
                None
            }
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                None
            }
        };
        documents.push(CandidateDocument::new(path, text));
    }

    println!("🔍 Analyzing resumes...");
    let progress = ProgressBar::new(documents.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner} [{bar:40.cyan/blue}] {pos}/{len} resumes ({elapsed})")
    {
        progress.set_style(style.progress_chars("=>-"));
    }
    progress.enable_steady_tick(Duration::from_millis(100));

    let shortlist = shortlister.shortlist(&job_text, &documents, Some(&progress)).await;
    progress.finish_and_clear();
    let shortlist = shortlist?;

    let elapsed = start.elapsed().as_millis() as u64;
    info!("Shortlisted {} candidates in {}ms", shortlist.candidates.len(), elapsed);

    let report = ShortlistReport::new(
        shortlist,
        &job.to_string_lossy(),
        &config.llm.model,
        elapsed,
    );

    let options = DisplayOptions::from_config(&config.output, config.analysis.min_score_threshold, detailed);
    let generator = ReportGenerator::new(config.output.color_output, options);
    let format = config.output.format;

    if format == OutputFormat::Console {
        println!("{}", generator.generate_report(&report, OutputFormat::Console)?);
    } else {
        let content = generator.generate_report(&report, format)?;
        if save.is_none() {
            println!("{}", content);
        }
    }

    let (save_path, save_format) = match save {
        Some(path) => {
            let format = if format == OutputFormat::Console { OutputFormat::Text } else { format };
            (path, format)
        }
        None => (config.output.results_file.clone(), OutputFormat::Text),
    };
    let content = generator.generate_report(&report, save_format)?;
    save_report_to_file(&content, &save_path)?;
    println!("💾 Results saved to {}", save_path.display());

    Ok(())
}
