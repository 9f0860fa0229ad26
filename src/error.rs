//! Error handling for the resume shortlister

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShortlisterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("LLM API error (status {status}): {message}")]
    LlmApi { status: u16, message: String },

    #[error("Malformed judgment: {0}")]
    MalformedJudgment(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ShortlisterError>;

/// Convert HTTP client errors to our custom error type
impl From<reqwest::Error> for ShortlisterError {
    fn from(err: reqwest::Error) -> Self {
        ShortlisterError::Network(err.to_string())
    }
}
