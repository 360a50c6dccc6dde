//! Text processing and scoring

pub mod text_normalizer;
pub mod pattern_scorer;
pub mod pipeline;
pub mod combinations;
pub mod explanation;

pub use pipeline::{AnalysisResult, RecommendationEngine};
