//! Configuration management for the career compass

use crate::error::{CompassError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub scoring: ScoringConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog TOML replacing the bundled one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Weights and limits used by the recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Multiplier for hits in the strength answer
    pub strength_weight: f64,
    /// Multiplier for hits in the interest answer
    pub interest_weight: f64,
    /// Share of theme signal redistributed into industry scores
    pub theme_influence: f64,
    pub recommendation_count: usize,
    /// How many ranked industries the combination rules look at
    pub combination_window: usize,
    pub max_evidence_keywords: usize,
    /// Evidence keywords quoted in a recommendation reason
    pub reason_keyword_limit: usize,
    pub dominant_theme_count: usize,
    /// Score given to the fallback industry when nothing matched
    pub fallback_score: f64,
    pub style_entries_per_theme: usize,
    pub reflections_per_theme: usize,
    pub max_roles: usize,
    pub max_tasks: usize,
    pub max_adjacent: usize,
    pub max_first_steps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub max_file_size_bytes: u64,
    /// Aggregated document text is cut to this many characters
    pub max_extracted_chars: usize,
    pub preview_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strength_weight: 1.2,
            interest_weight: 1.5,
            theme_influence: 0.35,
            recommendation_count: 2,
            combination_window: 3,
            max_evidence_keywords: 8,
            reason_keyword_limit: 5,
            dominant_theme_count: 2,
            fallback_score: 0.1,
            style_entries_per_theme: 2,
            reflections_per_theme: 1,
            max_roles: 3,
            max_tasks: 3,
            max_adjacent: 3,
            max_first_steps: 3,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024,
            max_extracted_chars: 8000,
            preview_chars: 500,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
            pretty_json: true,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("strength_weight", self.strength_weight),
            ("interest_weight", self.interest_weight),
            ("theme_influence", self.theme_influence),
            ("fallback_score", self.fallback_score),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(CompassError::Configuration(format!(
                    "scoring.{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.recommendation_count == 0 {
            return Err(CompassError::Configuration(
                "scoring.recommendation_count must be at least 1".to_string(),
            ));
        }
        if self.combination_window == 0 {
            return Err(CompassError::Configuration(
                "scoring.combination_window must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config {
    /// Load from `path`, or from the default location when none is given.
    /// A missing default file is created with defaults; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CompassError::Configuration(format!(
                        "Config file does not exist: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::from_file(&config_path)?
                } else {
                    let config = Self::default();
                    config.save_to(&config_path)?;
                    config
                }
            }
        };

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| CompassError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.scoring.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CompassError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("career-compass")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_scoring_constants() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.strength_weight, 1.2);
        assert_eq!(scoring.interest_weight, 1.5);
        assert_eq!(scoring.theme_influence, 0.35);
        assert_eq!(scoring.recommendation_count, 2);
        assert_eq!(scoring.combination_window, 3);
        assert_eq!(scoring.fallback_score, 0.1);
        assert!(scoring.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str("[scoring]\ninterest_weight = 2.0\n").unwrap();
        assert_eq!(config.scoring.interest_weight, 2.0);
        assert_eq!(config.scoring.strength_weight, 1.2);
        assert_eq!(config.input.max_extracted_chars, 8000);
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let mut scoring = ScoringConfig::default();
        scoring.theme_influence = -0.5;
        assert!(scoring.validate().is_err());

        let mut scoring = ScoringConfig::default();
        scoring.strength_weight = f64::NAN;
        assert!(scoring.validate().is_err());

        let mut scoring = ScoringConfig::default();
        scoring.recommendation_count = 0;
        assert!(scoring.validate().is_err());
    }

    #[test]
    fn test_invalid_scoring_in_toml_rejected() {
        let result = Config::from_toml_str("[scoring]\nrecommendation_count = 0\nstrength_weight = -1.0\n");
        assert!(matches!(result, Err(CompassError::Configuration(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.output.format = OutputFormat::Markdown;
        config.catalog.path = Some(PathBuf::from("/tmp/catalog.toml"));
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(CompassError::Configuration(_))
        ));
    }
}
