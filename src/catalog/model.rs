//! Catalog entry types

use regex::Regex;
use std::collections::BTreeMap;

/// Candidate occupational field
#[derive(Debug, Clone)]
pub struct IndustryCategory {
    pub name: String,
    /// Compiled against normalized text
    pub patterns: Vec<Regex>,
    pub roles: Vec<String>,
    pub typical_tasks: Vec<String>,
    pub values_fit: Vec<String>,
}

/// Underlying drive inferred from the answers, used to re-weight industries
#[derive(Debug, Clone)]
pub struct MotivationalTheme {
    pub key: String,
    pub patterns: Vec<Regex>,
    pub description: String,
    pub suited_styles: Vec<String>,
    pub reflection: Vec<String>,
}

/// Cross-industry suggestion emitted when every `requires` industry is
/// among the top-ranked candidates
#[derive(Debug, Clone, PartialEq)]
pub struct CombinationRule {
    pub requires: Vec<String>,
    pub label: String,
    pub roles: Vec<String>,
    pub why: String,
}

/// theme key -> industry name -> weight
pub type ThemeInfluenceMap = BTreeMap<String, BTreeMap<String, f64>>;
