//! Input manager: validates document paths and aggregates their text

use crate::config::InputConfig;
use crate::error::{CompassError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use unicode_segmentation::UnicodeSegmentation;

pub struct InputManager {
    limits: InputConfig,
    cache: HashMap<PathBuf, String>,
}

/// Aggregated text of all supplied documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocuments {
    pub text: String,
    pub sources: Vec<DocumentSource>,
    /// Set when the joined text was cut to the configured limit
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub path: String,
    pub file_type: FileType,
    /// Character count of the cleaned text
    pub chars: usize,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Extracted,
    OcrUnavailable,
    ExtractionFailed { reason: String },
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStatus::Extracted => f.write_str("extracted"),
            DocumentStatus::OcrUnavailable => f.write_str("ocr_unavailable"),
            DocumentStatus::ExtractionFailed { reason } => write!(f, "extraction_failed: {}", reason),
        }
    }
}

impl ExtractedDocuments {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// First `limit` graphemes of the aggregated text
    pub fn preview(&self, limit: usize) -> String {
        truncate_graphemes(&self.text, limit).0
    }
}

impl InputManager {
    pub fn new(limits: InputConfig) -> Self {
        Self {
            limits,
            cache: HashMap::new(),
        }
    }

    /// Check that `path` exists, has a supported extension and fits the
    /// size limit.
    pub fn validate(&self, path: &Path) -> Result<FileType> {
        let file_type = FileType::from_path(path);
        if !file_type.is_supported() {
            return Err(CompassError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        if !path.exists() {
            return Err(CompassError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let size = std::fs::metadata(path)?.len();
        if size > self.limits.max_file_size_bytes {
            return Err(CompassError::FileTooLarge {
                path: path.display().to_string(),
                size,
                limit: self.limits.max_file_size_bytes,
            });
        }

        Ok(file_type)
    }

    /// Extract the raw text of one validated file. Images yield no text.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(cached) = self.cache.get(path) {
            info!("Using cached text for: {}", path.display());
            return Ok(cached.clone());
        }

        let file_type = self.validate(path)?;

        let text = match file_type {
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
            FileType::Image => {
                warn!("No text read from image {}: OCR is not available", path.display());
                String::new()
            }
            FileType::Unknown => String::new(),
        };

        self.cache.insert(path.to_path_buf(), text.clone());

        Ok(text)
    }

    /// Validate every path up front, then extract and join their text.
    /// A file that fails to extract contributes no text and is reported in
    /// its [`DocumentSource`] instead of failing the batch.
    pub async fn extract_documents(&mut self, paths: &[PathBuf]) -> Result<ExtractedDocuments> {
        let file_types = paths
            .iter()
            .map(|path| self.validate(path))
            .collect::<Result<Vec<_>>>()?;

        let mut texts = Vec::with_capacity(paths.len());
        let mut sources = Vec::with_capacity(paths.len());

        for (path, file_type) in paths.iter().zip(file_types) {
            let (text, status) = if file_type == FileType::Image {
                warn!("Skipping image {}: OCR is not available", path.display());
                (String::new(), DocumentStatus::OcrUnavailable)
            } else {
                match self.extract_text(path).await {
                    Ok(raw) => (clean_whitespace(&raw), DocumentStatus::Extracted),
                    Err(e) => {
                        warn!("Failed to extract {}: {}", path.display(), e);
                        (String::new(), DocumentStatus::ExtractionFailed { reason: e.to_string() })
                    }
                }
            };

            sources.push(DocumentSource {
                path: path.display().to_string(),
                file_type,
                chars: text.chars().count(),
                status,
            });
            if !text.is_empty() {
                texts.push(text);
            }
        }

        let (text, truncated) = truncate_graphemes(&texts.join(" "), self.limits.max_extracted_chars);
        if truncated {
            info!(
                "Document text truncated to {} characters",
                self.limits.max_extracted_chars
            );
        }

        Ok(ExtractedDocuments {
            text,
            sources,
            truncated,
        })
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

fn clean_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_graphemes(text: &str, limit: usize) -> (String, bool) {
    match text.grapheme_indices(true).nth(limit) {
        Some((cut, _)) => (text[..cut].to_string(), true),
        None => (text.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn limits(max_chars: usize) -> InputConfig {
        InputConfig {
            max_extracted_chars: max_chars,
            ..InputConfig::default()
        }
    }

    #[test]
    fn test_truncate_keeps_grapheme_clusters() {
        let family = "👨\u{200d}👩\u{200d}👧";
        let text = format!("ab{}cd", family);

        assert_eq!(truncate_graphemes(&text, 3), (format!("ab{}", family), true));
        assert_eq!(truncate_graphemes(&text, 5), (text.clone(), false));
        assert_eq!(truncate_graphemes("", 0), (String::new(), false));
    }

    #[test]
    fn test_validate_rejections() {
        let dir = tempdir().unwrap();
        let manager = InputManager::new(InputConfig {
            max_file_size_bytes: 4,
            ..InputConfig::default()
        });

        let unknown = dir.path().join("resume.docx");
        std::fs::write(&unknown, "x").unwrap();
        assert!(matches!(manager.validate(&unknown), Err(CompassError::UnsupportedFormat(_))));

        let missing = dir.path().join("missing.txt");
        assert!(matches!(manager.validate(&missing), Err(CompassError::InvalidInput(_))));

        let large = dir.path().join("large.txt");
        std::fs::write(&large, "12345").unwrap();
        assert!(matches!(
            manager.validate(&large),
            Err(CompassError::FileTooLarge { size: 5, limit: 4, .. })
        ));
    }

    #[tokio::test]
    async fn test_extract_documents_joins_and_records_sources() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("strengths.txt");
        let md = dir.path().join("notes.md");
        let png = dir.path().join("portfolio.png");
        std::fs::write(&txt, "データ分析が\n\n得意です").unwrap();
        std::fs::write(&md, "## 興味\n\n*研修* の企画").unwrap();
        std::fs::write(&png, [0x89, b'P', b'N', b'G']).unwrap();

        let mut manager = InputManager::new(limits(8000));
        let docs = manager
            .extract_documents(&[txt, md, png])
            .await
            .unwrap();

        assert_eq!(docs.text, "データ分析が 得意です 興味 研修 の企画");
        assert!(!docs.truncated);
        assert_eq!(docs.sources.len(), 3);
        assert_eq!(docs.sources[0].status, DocumentStatus::Extracted);
        assert_eq!(docs.sources[0].chars, 11);
        assert_eq!(docs.sources[2].file_type, FileType::Image);
        assert_eq!(docs.sources[2].status.to_string(), "ocr_unavailable");
        assert_eq!(manager.cache_size(), 2);
    }

    #[tokio::test]
    async fn test_extraction_failure_degrades() {
        let dir = tempdir().unwrap();
        let pdf = dir.path().join("broken.pdf");
        let txt = dir.path().join("ok.txt");
        std::fs::write(&pdf, b"not a pdf").unwrap();
        std::fs::write(&txt, "接客").unwrap();

        let mut manager = InputManager::new(limits(8000));
        let docs = manager.extract_documents(&[pdf, txt]).await.unwrap();

        assert_eq!(docs.text, "接客");
        assert!(matches!(docs.sources[0].status, DocumentStatus::ExtractionFailed { .. }));
        assert!(docs.sources[0].status.to_string().starts_with("extraction_failed: "));
        assert_eq!(docs.sources[0].chars, 0);
        assert_eq!(docs.sources[1].status, DocumentStatus::Extracted);
    }

    #[tokio::test]
    async fn test_aggregate_truncated() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("long.txt");
        std::fs::write(&txt, "あ".repeat(20)).unwrap();

        let mut manager = InputManager::new(limits(8));
        let docs = manager.extract_documents(&[txt]).await.unwrap();

        assert!(docs.truncated);
        assert_eq!(docs.text, "あ".repeat(8));
        assert_eq!(docs.preview(3), "あああ");
        assert_eq!(docs.sources[0].chars, 20);
    }

    #[tokio::test]
    async fn test_chars_counts_code_points() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("accent.txt");
        std::fs::write(&txt, "e\u{301}cole").unwrap();

        let mut manager = InputManager::new(limits(8000));
        let docs = manager.extract_documents(&[txt]).await.unwrap();

        assert_eq!(docs.sources[0].chars, 6);
        assert_eq!(docs.preview(1), "e\u{301}");
    }

    #[tokio::test]
    async fn test_image_answer_file_yields_no_text() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("answer.png");
        std::fs::write(&png, [0x89, b'P', b'N', b'G']).unwrap();

        let mut manager = InputManager::new(limits(8000));
        assert_eq!(manager.extract_text(&png).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_image_only_documents_are_empty() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("portfolio.png");
        std::fs::write(&png, [0x89, b'P', b'N', b'G']).unwrap();

        let mut manager = InputManager::new(limits(8000));
        let docs = manager.extract_documents(&[png]).await.unwrap();

        assert!(docs.is_empty());
        assert_eq!(docs.sources[0].status, DocumentStatus::OcrUnavailable);
    }

    #[tokio::test]
    async fn test_invalid_path_fails_batch() {
        let dir = tempdir().unwrap();
        let mut manager = InputManager::new(InputConfig::default());
        let result = manager
            .extract_documents(&[dir.path().join("absent.md")])
            .await;
        assert!(result.is_err());
    }
}
