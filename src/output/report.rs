//! Report envelope around an analysis result

use crate::input::{DocumentSource, ExtractedDocuments};
use crate::processing::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a formatter needs to render one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub metadata: ReportMetadata,
    /// Present when documents were supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<DocumentDigest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub processing_time_ms: u64,
    /// `builtin` or the catalog file path
    pub catalog_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDigest {
    pub sources: Vec<DocumentSource>,
    pub text_preview: String,
    pub truncated: bool,
}

impl ReportMetadata {
    pub fn new(catalog_source: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            processing_time_ms,
            catalog_source: catalog_source.into(),
        }
    }
}

impl DocumentDigest {
    pub fn from_documents(documents: &ExtractedDocuments, preview_chars: usize) -> Self {
        Self {
            sources: documents.sources.clone(),
            text_preview: documents.preview(preview_chars),
            truncated: documents.truncated,
        }
    }
}

impl AnalysisReport {
    pub fn new(result: AnalysisResult, metadata: ReportMetadata) -> Self {
        Self {
            result,
            metadata,
            documents: None,
        }
    }

    pub fn with_documents(mut self, digest: DocumentDigest) -> Self {
        self.documents = Some(digest);
        self
    }
}
