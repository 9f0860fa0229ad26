//! Deterministic candidate name extraction from resume text.
//!
//! The heuristic is conservative: falling back to the file identifier is
//! preferred over mistaking a header or skill line for a name.

use crate::error::{Result, ShortlisterError};
use aho_corasick::AhoCorasick;
use std::path::Path;

/// Name used when neither the text nor the source identifies the candidate
pub const UNKNOWN_CANDIDATE: &str = "Unknown Candidate";

/// Only the top of a resume is searched
const MAX_LINES_SCANNED: usize = 10;
const MIN_LINE_CHARS: usize = 3;
const MIN_NAME_WORDS: usize = 2;
const MAX_NAME_WORDS: usize = 4;
const NAME_WORDS_TAKEN: usize = 3;
const MAX_NAME_CHARS: usize = 50;

/// Resume section headers and technical terms that never appear in a name line
pub const HEADER_DENYLIST: &[&str] = &[
    "RESUME",
    "CV",
    "CURRICULUM",
    "PROFILE",
    "OBJECTIVE",
    "SUMMARY",
    "EXPERIENCE",
    "EDUCATION",
    "SKILLS",
    "PROFESSIONAL",
    "PYTHON",
    "JAVA",
    "C++",
    "JAVASCRIPT",
    "SQL",
    "AWS",
    "DOCKER",
];

/// Characters that mark a list rather than a name
pub const LIST_SEPARATORS: &[char] = &[',', ':', ';', '|'];

/// One acceptance rule for a candidate name line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    MinWords,
    NameLikeWords,
    ReasonableLength,
    NoHeaderTokens,
    NoListSeparators,
    MaxWords,
}

/// All rules a line must pass, checked in order
pub const NAME_RULES: [NameRule; 6] = [
    NameRule::MinWords,
    NameRule::NameLikeWords,
    NameRule::ReasonableLength,
    NameRule::NoHeaderTokens,
    NameRule::NoListSeparators,
    NameRule::MaxWords,
];

/// A trimmed line split into words
#[derive(Debug, Clone)]
pub struct NameLine<'a> {
    pub line: &'a str,
    pub words: Vec<&'a str>,
}

impl<'a> NameLine<'a> {
    pub fn new(line: &'a str) -> Self {
        let line = line.trim();
        Self {
            line,
            words: line.split_whitespace().collect(),
        }
    }

    fn leading_words(&self) -> &[&'a str] {
        &self.words[..self.words.len().min(NAME_WORDS_TAKEN)]
    }

    pub fn candidate_name(&self) -> String {
        self.leading_words().join(" ")
    }
}

pub struct NameExtractor {
    denylist: AhoCorasick,
}

impl NameExtractor {
    pub fn new() -> Result<Self> {
        Self::with_denylist(HEADER_DENYLIST)
    }

    /// Build with a custom set of tokens that disqualify a line
    pub fn with_denylist(tokens: &[&str]) -> Result<Self> {
        let denylist = AhoCorasick::new(tokens).map_err(|e| {
            ShortlisterError::TextProcessing(format!("Failed to build name denylist: {}", e))
        })?;
        Ok(Self { denylist })
    }

    /// Candidate name from the first qualifying line, else `fallback_id`.
    /// Never returns an empty string.
    pub fn extract(&self, resume_text: &str, fallback_id: &str) -> String {
        match self.find_name(resume_text) {
            Some(name) => name,
            None if fallback_id.trim().is_empty() => UNKNOWN_CANDIDATE.to_string(),
            None => fallback_id.to_string(),
        }
    }

    /// First three words of the first line among the top ten that passes every rule
    pub fn find_name(&self, resume_text: &str) -> Option<String> {
        resume_text
            .split('\n')
            .take(MAX_LINES_SCANNED)
            .map(NameLine::new)
            .filter(|line| line.line.chars().count() >= MIN_LINE_CHARS)
            .find(|line| self.accepts(line))
            .map(|line| line.candidate_name())
    }

    pub fn accepts(&self, line: &NameLine<'_>) -> bool {
        NAME_RULES.iter().all(|rule| self.check(*rule, line))
    }

    pub fn check(&self, rule: NameRule, line: &NameLine<'_>) -> bool {
        match rule {
            NameRule::MinWords => line.words.len() >= MIN_NAME_WORDS,
            NameRule::NameLikeWords => line.leading_words().iter().all(|word| is_name_like(word)),
            NameRule::ReasonableLength => line.candidate_name().chars().count() < MAX_NAME_CHARS,
            NameRule::NoHeaderTokens => !self.denylist.is_match(&line.line.to_uppercase()),
            NameRule::NoListSeparators => !line.line.contains(LIST_SEPARATORS),
            NameRule::MaxWords => line.words.len() <= MAX_NAME_WORDS,
        }
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new().expect("Failed to create default name extractor")
    }
}

/// Identifier derived from a source path: file name without directory or extension
pub fn fallback_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Alphabetic once periods and commas are dropped, or written in capitals
fn is_name_like(word: &str) -> bool {
    let letters: String = word.chars().filter(|c| *c != '.' && *c != ',').collect();
    let alphabetic = !letters.is_empty() && letters.chars().all(char::is_alphabetic);
    alphabetic || is_all_caps(word)
}

/// At least one cased character and no lower-case ones
fn is_all_caps(word: &str) -> bool {
    let mut has_cased = false;
    for c in word.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}
