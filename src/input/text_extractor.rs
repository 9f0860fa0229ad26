//! Text extraction from various file formats

use crate::error::{Result, ShortlisterError};
use pulldown_cmark::{html, Parser};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

/// Main body part of a WordprocessingML package
const DOCX_DOCUMENT_PART: &str = "word/document.xml";

/// Page separator emitted by the PDF text extractor
const PAGE_BREAK: char = '\u{c}';

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ShortlisterError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })?;

        let text = join_pdf_pages(&text);
        if text.is_empty() {
            return Err(ShortlisterError::PdfExtraction(format!(
                "No text found in PDF '{}'",
                path.display()
            )));
        }
        Ok(text)
    }
}

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            ShortlisterError::DocxExtraction(format!(
                "'{}' is not a Word document package: {}",
                path.display(),
                e
            ))
        })?;
        let mut part = archive.by_name(DOCX_DOCUMENT_PART).map_err(|e| {
            ShortlisterError::DocxExtraction(format!(
                "'{}' has no {}: {}",
                path.display(),
                DOCX_DOCUMENT_PART,
                e
            ))
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)?;
        docx_xml_to_text(&xml)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        markdown_to_text(&markdown_content)
    }
}

/// Render markdown and strip the markup, one non-blank line per block
pub fn markdown_to_text(markdown: &str) -> Result<String> {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br />", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let tags = Regex::new(r"<[^>]*>")
        .map_err(|e| ShortlisterError::TextProcessing(format!("Invalid tag pattern: {}", e)))?;
    let clean_text = tags.replace_all(&text, "").replace("&amp;", "&");

    Ok(non_blank_lines(&clean_text))
}

/// Text of a `word/document.xml` part.
///
/// Body paragraphs come first, then the text of each top-level table cell,
/// its paragraphs joined by newlines. Entries are trimmed and blank ones
/// dropped. Nested tables and paragraphs inside text boxes are skipped.
pub fn docx_xml_to_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut body: Vec<String> = Vec::new();
    let mut cells: Vec<String> = Vec::new();
    let mut cell_paragraphs: Vec<String> = Vec::new();
    let mut paragraph = String::new();
    let mut paragraph_depth = 0usize;
    let mut table_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            ShortlisterError::DocxExtraction(format!("Malformed document XML: {}", e))
        })?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:tc" if table_depth == 1 => cell_paragraphs.clear(),
                b"w:p" => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 {
                        paragraph.clear();
                    }
                }
                b"w:t" => in_text = paragraph_depth == 1,
                _ => {}
            },
            Event::Empty(e) if paragraph_depth == 1 => match e.name().as_ref() {
                b"w:tab" => paragraph.push('\t'),
                b"w:br" | b"w:cr" => paragraph.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|e| {
                    ShortlisterError::DocxExtraction(format!("Malformed document text: {}", e))
                })?;
                paragraph.push_str(&text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    if paragraph_depth == 0 {
                        match table_depth {
                            0 => body.push(std::mem::take(&mut paragraph)),
                            1 => cell_paragraphs.push(std::mem::take(&mut paragraph)),
                            _ => paragraph.clear(),
                        }
                    }
                }
                b"w:tc" if table_depth == 1 => cells.push(cell_paragraphs.join("\n")),
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(body
        .iter()
        .chain(cells.iter())
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Trim each page and join the non-empty ones. Blank lines inside a page stay.
pub fn join_pdf_pages(text: &str) -> String {
    text.split(PAGE_BREAK)
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn non_blank_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
