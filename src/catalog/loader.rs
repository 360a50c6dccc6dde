//! TOML catalog loading

use crate::catalog::model::{CombinationRule, IndustryCategory, MotivationalTheme, ThemeInfluenceMap};
use crate::catalog::Catalog;
use crate::error::{CompassError, Result};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    fallback: FallbackEntry,
    #[serde(default)]
    industries: Vec<IndustryEntry>,
    #[serde(default)]
    themes: Vec<ThemeEntry>,
    #[serde(default)]
    influence: ThemeInfluenceMap,
    #[serde(default)]
    adjacent: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    first_steps: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    combinations: Vec<CombinationEntry>,
}

#[derive(Debug, Deserialize)]
struct FallbackEntry {
    industry: String,
}

#[derive(Debug, Deserialize)]
struct IndustryEntry {
    name: String,
    patterns: Vec<String>,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    typical_tasks: Vec<String>,
    #[serde(default)]
    values_fit: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ThemeEntry {
    key: String,
    patterns: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    suited_styles: Vec<String>,
    #[serde(default)]
    reflection: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CombinationEntry {
    requires: Vec<String>,
    label: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    why: String,
}

impl Catalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CompassError::Catalog(format!("Failed to read catalog '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| CompassError::Catalog(format!("Failed to parse catalog: {}", e)))?;

        let industries = file
            .industries
            .into_iter()
            .map(|entry| {
                Ok(IndustryCategory {
                    patterns: compile_patterns(&entry.name, &entry.patterns)?,
                    name: entry.name,
                    roles: entry.roles,
                    typical_tasks: entry.typical_tasks,
                    values_fit: entry.values_fit,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let themes = file
            .themes
            .into_iter()
            .map(|entry| {
                Ok(MotivationalTheme {
                    patterns: compile_patterns(&entry.key, &entry.patterns)?,
                    key: entry.key,
                    description: entry.description,
                    suited_styles: entry.suited_styles,
                    reflection: entry.reflection,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let combinations = file
            .combinations
            .into_iter()
            .map(|entry| CombinationRule {
                requires: entry.requires,
                label: entry.label,
                roles: entry.roles,
                why: entry.why,
            })
            .collect();

        debug!(
            "Parsed catalog with {} industries, {} themes",
            industries.len(),
            themes.len()
        );

        Catalog::new(
            industries,
            themes,
            file.influence,
            file.adjacent,
            file.first_steps,
            combinations,
            file.fallback.industry,
        )
    }
}

fn compile_patterns(owner: &str, patterns: &[String]) -> Result<Vec<Regex>> {
    if patterns.is_empty() {
        return Err(CompassError::Catalog(format!("'{}' has no patterns", owner)));
    }

    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| {
                CompassError::Catalog(format!("'{}' has an invalid pattern '{}': {}", owner, pattern, e))
            })
        })
        .collect()
}
