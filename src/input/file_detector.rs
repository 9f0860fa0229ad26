//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    /// `.docx`, and `.doc` files saved in the same package format
    Word,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            "doc" | "docx" => FileType::Word,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    /// Whether files of this type belong in a resume batch
    pub fn is_resume_candidate(self) -> bool {
        !matches!(self, FileType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("markdown"), FileType::Markdown);
        assert_eq!(FileType::from_extension("docx"), FileType::Word);
        assert_eq!(FileType::from_path(Path::new("notes")), FileType::Unknown);
        assert_eq!(FileType::from_path(Path::new("cv.txt")), FileType::Text);
    }

    #[test]
    fn test_word_files_join_batches() {
        assert!(FileType::Word.is_resume_candidate());
        assert!(!FileType::Unknown.is_resume_candidate());
    }
}
