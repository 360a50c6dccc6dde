//! Recommendation catalog: industries, motivational themes and the static
//! tables that connect them.
//!
//! A [`Catalog`] is built once (from the bundled TOML or a user file) and is
//! read-only afterwards, so a single instance can be shared between threads
//! behind an `Arc`.

pub mod loader;
pub mod model;

pub use model::{CombinationRule, IndustryCategory, MotivationalTheme, ThemeInfluenceMap};

use crate::error::{CompassError, Result};
use log::warn;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct Catalog {
    industries: Vec<IndustryCategory>,
    themes: Vec<MotivationalTheme>,
    influence: ThemeInfluenceMap,
    adjacent: BTreeMap<String, Vec<String>>,
    first_steps: BTreeMap<String, Vec<String>>,
    combinations: Vec<CombinationRule>,
    fallback_industry: String,
    industry_index: HashMap<String, usize>,
}

/// Influence edge whose target industry is not in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingInfluence {
    pub theme: String,
    pub industry: String,
}

impl Catalog {
    /// Assemble and validate a catalog. Industry and theme order is kept as
    /// given and used for tie-breaking.
    pub fn new(
        industries: Vec<IndustryCategory>,
        themes: Vec<MotivationalTheme>,
        influence: ThemeInfluenceMap,
        adjacent: BTreeMap<String, Vec<String>>,
        first_steps: BTreeMap<String, Vec<String>>,
        combinations: Vec<CombinationRule>,
        fallback_industry: String,
    ) -> Result<Self> {
        let mut industry_index = HashMap::with_capacity(industries.len());
        for (position, industry) in industries.iter().enumerate() {
            if industry.name.trim().is_empty() {
                return Err(CompassError::Catalog(format!(
                    "industry #{} has an empty name",
                    position + 1
                )));
            }
            if industry_index.insert(industry.name.clone(), position).is_some() {
                return Err(CompassError::Catalog(format!(
                    "duplicate industry name '{}'",
                    industry.name
                )));
            }
        }

        let mut theme_keys = HashSet::with_capacity(themes.len());
        for (position, theme) in themes.iter().enumerate() {
            if theme.key.trim().is_empty() {
                return Err(CompassError::Catalog(format!(
                    "theme #{} has an empty key",
                    position + 1
                )));
            }
            if !theme_keys.insert(theme.key.as_str()) {
                return Err(CompassError::Catalog(format!(
                    "duplicate theme key '{}'",
                    theme.key
                )));
            }
        }

        for (theme, targets) in &influence {
            if !theme_keys.contains(theme.as_str()) {
                return Err(CompassError::Catalog(format!(
                    "influence table references unknown theme '{}'",
                    theme
                )));
            }
            for (industry, weight) in targets {
                if !weight.is_finite() || *weight <= 0.0 {
                    return Err(CompassError::Catalog(format!(
                        "influence weight {} -> {} must be positive, got {}",
                        theme, industry, weight
                    )));
                }
            }
        }

        for (table, entries) in [("adjacent", &adjacent), ("first_steps", &first_steps)] {
            if let Some(unknown) = entries.keys().find(|name| !industry_index.contains_key(*name)) {
                return Err(CompassError::Catalog(format!(
                    "{} table references unknown industry '{}'",
                    table, unknown
                )));
            }
        }

        for rule in &combinations {
            if rule.requires.is_empty() {
                return Err(CompassError::Catalog(format!(
                    "combination '{}' requires no industries",
                    rule.label
                )));
            }
            if let Some(unknown) = rule.requires.iter().find(|name| !industry_index.contains_key(*name)) {
                return Err(CompassError::Catalog(format!(
                    "combination '{}' references unknown industry '{}'",
                    rule.label, unknown
                )));
            }
        }

        if !industry_index.contains_key(&fallback_industry) {
            return Err(CompassError::Catalog(format!(
                "fallback industry '{}' is not in the catalog",
                fallback_industry
            )));
        }

        let catalog = Self {
            industries,
            themes,
            influence,
            adjacent,
            first_steps,
            combinations,
            fallback_industry,
            industry_index,
        };

        for dangling in catalog.dangling_influence_targets() {
            warn!(
                "Theme '{}' influences '{}', which is not a catalogued industry; the weight is ignored",
                dangling.theme, dangling.industry
            );
        }

        Ok(catalog)
    }

    pub fn industries(&self) -> &[IndustryCategory] {
        &self.industries
    }

    pub fn themes(&self) -> &[MotivationalTheme] {
        &self.themes
    }

    pub fn industry(&self, name: &str) -> Option<&IndustryCategory> {
        self.industry_index.get(name).map(|&i| &self.industries[i])
    }

    /// Catalog position of an industry, used as the ranking tie-break
    pub fn industry_position(&self, name: &str) -> Option<usize> {
        self.industry_index.get(name).copied()
    }

    pub fn theme(&self, key: &str) -> Option<&MotivationalTheme> {
        self.themes.iter().find(|t| t.key == key)
    }

    pub fn influence(&self) -> &ThemeInfluenceMap {
        &self.influence
    }

    /// Weight of `theme` on `industry`, zero when there is no edge
    pub fn influence_weight(&self, theme: &str, industry: &str) -> f64 {
        self.influence
            .get(theme)
            .and_then(|targets| targets.get(industry))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn adjacent_fields(&self, industry: &str) -> &[String] {
        self.adjacent.get(industry).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first_steps(&self, industry: &str) -> &[String] {
        self.first_steps.get(industry).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn combinations(&self) -> &[CombinationRule] {
        &self.combinations
    }

    pub fn fallback_industry(&self) -> &str {
        &self.fallback_industry
    }

    /// Influence edges pointing at industries that are not catalogued.
    /// They are kept in the map but never produce a ranked entry.
    pub fn dangling_influence_targets(&self) -> Vec<DanglingInfluence> {
        self.influence
            .iter()
            .flat_map(|(theme, targets)| {
                targets
                    .keys()
                    .filter(|industry| !self.industry_index.contains_key(*industry))
                    .map(move |industry| DanglingInfluence {
                        theme: theme.clone(),
                        industry: industry.clone(),
                    })
            })
            .collect()
    }
}
