//! Input manager for handling different file types

use crate::error::{Result, ShortlisterError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extracts text by file type, caching each path's text for the run
pub struct InputManager {
    cache: HashMap<PathBuf, String>,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(cached_text) = self.cache.get(path) {
            debug!("Using cached text for: {}", path.display());
            return Ok(cached_text.clone());
        }

        if !path.exists() {
            return Err(ShortlisterError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Word => {
                info!("Extracting text from Word document: {}", path.display());
                DocxExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(ShortlisterError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        self.cache.insert(path.to_path_buf(), text.clone());
        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Resume files named by `inputs`, in argument order.
///
/// Directories contribute their resume files (not recursively) sorted by name.
/// Files named explicitly are kept whatever their extension so that a failed
/// read still shows up in the ranking. At most `max` paths are returned.
pub fn collect_resume_paths(inputs: &[PathBuf], max: usize) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = WalkDir::new(input)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Skipping unreadable entry in {}: {}", input.display(), e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| FileType::from_path(path).is_resume_candidate())
                .collect();

            debug!("Found {} resume files in {}", entries.len(), input.display());
            paths.append(&mut entries);
        } else if input.exists() {
            paths.push(input.clone());
        } else {
            return Err(ShortlisterError::InvalidInput(format!(
                "Resume path does not exist: {}",
                input.display()
            )));
        }
    }

    if paths.len() > max {
        warn!(
            "Found {} resumes, only the first {} will be analyzed",
            paths.len(),
            max
        );
        paths.truncate(max);
    }

    Ok(paths)
}
