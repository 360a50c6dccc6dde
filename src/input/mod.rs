//! Document input: file detection, text extraction and aggregation

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use file_detector::FileType;
pub use manager::{DocumentSource, DocumentStatus, ExtractedDocuments, InputManager};
