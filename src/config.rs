//! Configuration management for the resume shortlister

use crate::error::{Result, ShortlisterError};
use crate::processing::ranker::DEFAULT_SENTINEL_NAMES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    /// Falls back to `OPENAI_API_KEY` when unset
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Perturb temperature and tag resumes to defeat response caching
    pub jitter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub concurrency: usize,
    pub max_resumes: usize,
    /// Records below this are hidden from display, never from the ranking
    pub min_score_threshold: f64,
    pub sentinel_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub max_matching_skills_display: usize,
    pub max_missing_skills_display: usize,
    pub results_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
    Text,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            max_tokens: 1200,
            temperature: 0.1,
            timeout_secs: 120,
            max_retries: 3,
            jitter: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_resumes: 50,
            min_score_threshold: 0.0,
            sentinel_names: DEFAULT_SENTINEL_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            max_matching_skills_display: 10,
            max_missing_skills_display: 5,
            results_file: PathBuf::from("resume_analysis_results.txt"),
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| {
                ShortlisterError::Configuration(format!("Failed to parse config: {}", e))
            })
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ShortlisterError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-shortlister")
            .join("config.toml")
    }

    /// Set one scalar value by dotted key, e.g. `llm.model`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "llm.model" => self.llm.model = value.to_string(),
            "llm.base_url" => self.llm.base_url = value.to_string(),
            "llm.api_key" => {
                self.llm.api_key = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "llm.max_tokens" => self.llm.max_tokens = parse_value(key, value)?,
            "llm.temperature" => {
                let temperature: f64 = parse_value(key, value)?;
                if !(0.0..=2.0).contains(&temperature) {
                    return Err(ShortlisterError::Configuration(format!(
                        "llm.temperature must be between 0 and 2, got {}",
                        temperature
                    )));
                }
                self.llm.temperature = temperature;
            }
            "llm.timeout_secs" => self.llm.timeout_secs = parse_value(key, value)?,
            "llm.max_retries" => self.llm.max_retries = parse_value(key, value)?,
            "llm.jitter" => self.llm.jitter = parse_value(key, value)?,
            "analysis.concurrency" => {
                let concurrency: usize = parse_value(key, value)?;
                if concurrency == 0 {
                    return Err(ShortlisterError::Configuration(
                        "analysis.concurrency must be at least 1".to_string(),
                    ));
                }
                self.analysis.concurrency = concurrency;
            }
            "analysis.max_resumes" => self.analysis.max_resumes = parse_value(key, value)?,
            "analysis.min_score_threshold" => {
                self.analysis.min_score_threshold = parse_value(key, value)?
            }
            "analysis.sentinel_names" => {
                self.analysis.sentinel_names = value
                    .split(',')
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect()
            }
            "output.format" => self.output.format = parse_output_format(value)?,
            "output.color_output" => self.output.color_output = parse_value(key, value)?,
            "output.max_matching_skills_display" => {
                self.output.max_matching_skills_display = parse_value(key, value)?
            }
            "output.max_missing_skills_display" => {
                self.output.max_missing_skills_display = parse_value(key, value)?
            }
            "output.results_file" => self.output.results_file = PathBuf::from(value),
            _ => {
                return Err(ShortlisterError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        ShortlisterError::Configuration(format!("Invalid value for {}: '{}'", key, value))
    })
}

pub fn parse_output_format(format: &str) -> Result<OutputFormat> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        "text" | "txt" => Ok(OutputFormat::Text),
        _ => Err(ShortlisterError::InvalidInput(format!(
            "Unsupported output format: {}. Supported: console, json, markdown, html, text",
            format
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.max_tokens, 1200);
        assert_eq!(config.llm.temperature, 0.1);
        assert_eq!(config.analysis.max_resumes, 50);
        assert_eq!(config.analysis.sentinel_names, vec!["AVINASH".to_string()]);
        assert_eq!(config.output.max_matching_skills_display, 10);
        assert_eq!(config.output.max_missing_skills_display, 5);
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.llm.model = "gpt-4o".to_string();
        config.analysis.concurrency = 8;
        config.output.format = OutputFormat::Markdown;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nmodel = \"gpt-4o-mini\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 1200);
        assert_eq!(config.analysis, AnalysisConfig::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "llm = 3").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ShortlisterError::Configuration(_))
        ));
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("llm.model", "gpt-4o").unwrap();
        config.set_value("analysis.concurrency", "2").unwrap();
        config.set_value("analysis.sentinel_names", "AVINASH, JOHN DOE").unwrap();
        config.set_value("output.format", "html").unwrap();
        config.set_value("llm.jitter", "false").unwrap();

        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.analysis.concurrency, 2);
        assert_eq!(config.analysis.sentinel_names.len(), 2);
        assert_eq!(config.output.format, OutputFormat::Html);
        assert!(!config.llm.jitter);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set_value("llm.max_tokens", "lots").is_err());
        assert!(config.set_value("analysis.concurrency", "0").is_err());
        assert!(config.set_value("llm.temperature", "3.5").is_err());
        assert!(config.set_value("scoring.weight", "1").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(parse_output_format("txt").unwrap(), OutputFormat::Text);
        assert!(parse_output_format("pdf").is_err());
    }
}
