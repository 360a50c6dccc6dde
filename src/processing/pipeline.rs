//! Recommendation engine: scores industries and themes, blends theme signal
//! into industry scores, ranks, and assembles the explained result.

use crate::catalog::Catalog;
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::processing::combinations::{evaluate_combinations, CombinationSuggestion};
use crate::processing::explanation::{build_reason, build_summary, Summary};
use crate::processing::pattern_scorer::ScoreEvidence;
use crate::processing::text_normalizer::normalize;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stateless per call; share one engine between threads behind an `Arc`
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    scoring: ScoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: Summary,
    pub recommendations: Vec<Recommendation>,
    pub combination_suggestions: Vec<CombinationSuggestion>,
    /// Every ranked industry, best first
    pub raw_scores: Vec<RankedIndustry>,
    pub details: AnalysisDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub industry: String,
    pub score: f64,
    pub roles: Vec<String>,
    pub reason: String,
    pub evidence_keywords: Vec<String>,
    pub typical_tasks: Vec<String>,
    pub fit_values: Vec<String>,
    pub adjacent_fields: Vec<String>,
    pub first_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedIndustry {
    pub industry: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    /// Industries with a direct pattern hit or a theme bonus, catalog order
    pub industries: Vec<IndustryScore>,
    /// Themes with a positive score, catalog order
    pub themes: Vec<ThemeScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryScore {
    pub industry: String,
    pub evidence: ScoreEvidence,
    /// Contribution redistributed from themes
    pub theme_bonus: f64,
    /// `evidence.score + theme_bonus`
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeScore {
    pub theme: String,
    pub evidence: ScoreEvidence,
}

impl ThemeScore {
    pub fn score(&self) -> f64 {
        self.evidence.score
    }
}

impl RecommendationEngine {
    /// Fails when `scoring` has negative weights or zero counts, which would
    /// let `analyze` return no recommendation.
    pub fn new(catalog: Arc<Catalog>, scoring: ScoringConfig) -> Result<Self> {
        scoring.validate()?;
        Ok(Self { catalog, scoring })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Analyze the two free-text answers. Never fails and always returns at
    /// least one recommendation.
    pub fn analyze(&self, strength_text: &str, interest_text: &str) -> AnalysisResult {
        let strength = normalize(strength_text);
        let interest = normalize(interest_text);

        let base = self.score_industries(&strength, &interest);
        let themes = self.score_themes(&strength, &interest);
        let bonuses = self.theme_bonuses(&themes);

        let industries: Vec<IndustryScore> = base
            .into_iter()
            .zip(bonuses)
            .zip(self.catalog.industries())
            .filter(|((evidence, bonus), _)| evidence.has_signal() || *bonus > 0.0)
            .map(|((evidence, theme_bonus), industry)| IndustryScore {
                industry: industry.name.clone(),
                score: evidence.score + theme_bonus,
                evidence,
                theme_bonus,
            })
            .collect();

        let raw_scores = self.rank(&industries);
        debug!("Ranked industries: {:?}", raw_scores);

        let ranked_themes = rank_themes(&themes);
        let dominant_themes: Vec<String> = ranked_themes
            .iter()
            .take(self.scoring.dominant_theme_count)
            .map(|t| t.theme.clone())
            .collect();

        let recommendations = raw_scores
            .iter()
            .take(self.scoring.recommendation_count)
            .map(|ranked| self.recommend(ranked, &industries, &dominant_themes))
            .collect();

        let window: Vec<&str> = raw_scores
            .iter()
            .take(self.scoring.combination_window)
            .map(|r| r.industry.as_str())
            .collect();
        let combination_suggestions = evaluate_combinations(self.catalog.combinations(), &window);

        let summary = build_summary(&self.catalog, &ranked_themes, &self.scoring);

        AnalysisResult {
            summary,
            recommendations,
            combination_suggestions,
            raw_scores,
            details: AnalysisDetails { industries, themes },
        }
    }

    /// Direct pattern evidence for every industry, catalog order
    fn score_industries(&self, strength: &str, interest: &str) -> Vec<ScoreEvidence> {
        self.catalog
            .industries()
            .iter()
            .map(|industry| {
                ScoreEvidence::collect(
                    &industry.patterns,
                    strength,
                    interest,
                    self.scoring.strength_weight,
                    self.scoring.interest_weight,
                )
            })
            .collect()
    }

    /// Themes with a positive score, catalog order
    fn score_themes(&self, strength: &str, interest: &str) -> Vec<ThemeScore> {
        self.catalog
            .themes()
            .iter()
            .map(|theme| ThemeScore {
                theme: theme.key.clone(),
                evidence: ScoreEvidence::collect(
                    &theme.patterns,
                    strength,
                    interest,
                    self.scoring.strength_weight,
                    self.scoring.interest_weight,
                ),
            })
            .filter(|t| t.evidence.has_signal())
            .collect()
    }

    /// Per-industry bonus (catalog order): each theme's share of the total
    /// theme score, damped by `theme_influence`, times its influence weight.
    /// Edges to uncatalogued industries are skipped.
    fn theme_bonuses(&self, themes: &[ThemeScore]) -> Vec<f64> {
        let mut bonuses = vec![0.0; self.catalog.industries().len()];

        let total: f64 = themes.iter().map(ThemeScore::score).sum();
        if total <= 0.0 {
            return bonuses;
        }

        for theme in themes {
            let influence = theme.score() / total * self.scoring.theme_influence;
            let Some(targets) = self.catalog.influence().get(&theme.theme) else {
                continue;
            };
            for (industry, weight) in targets {
                match self.catalog.industry_position(industry) {
                    Some(position) => bonuses[position] += influence * weight,
                    None => debug!("Skipping influence {} -> {}: not catalogued", theme.theme, industry),
                }
            }
        }

        bonuses
    }

    /// Best first; equal scores keep catalog order. Falls back to a single
    /// low-score entry when nothing scored.
    fn rank(&self, industries: &[IndustryScore]) -> Vec<RankedIndustry> {
        let mut ranked: Vec<RankedIndustry> = industries
            .iter()
            .map(|i| RankedIndustry {
                industry: i.industry.clone(),
                score: i.score,
            })
            .collect();

        // `industries` is in catalog order and sort_by is stable
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        if ranked.is_empty() {
            debug!("No industry or theme matched; using fallback");
            ranked.push(RankedIndustry {
                industry: self.catalog.fallback_industry().to_string(),
                score: self.scoring.fallback_score,
            });
        }

        ranked
    }

    fn recommend(
        &self,
        ranked: &RankedIndustry,
        industries: &[IndustryScore],
        dominant_themes: &[String],
    ) -> Recommendation {
        let keywords: Vec<String> = industries
            .iter()
            .find(|i| i.industry == ranked.industry)
            .map(|i| i.evidence.combined_evidence())
            .unwrap_or_default()
            .into_iter()
            .take(self.scoring.max_evidence_keywords)
            .collect();

        let reason = build_reason(
            &ranked.industry,
            &keywords,
            dominant_themes,
            self.scoring.reason_keyword_limit,
        );

        let (roles, typical_tasks, fit_values) = match self.catalog.industry(&ranked.industry) {
            Some(category) => (
                take_owned(&category.roles, self.scoring.max_roles),
                take_owned(&category.typical_tasks, self.scoring.max_tasks),
                category.values_fit.clone(),
            ),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };

        Recommendation {
            industry: ranked.industry.clone(),
            score: ranked.score,
            roles,
            reason,
            evidence_keywords: keywords,
            typical_tasks,
            fit_values,
            adjacent_fields: take_owned(
                self.catalog.adjacent_fields(&ranked.industry),
                self.scoring.max_adjacent,
            ),
            first_steps: take_owned(
                self.catalog.first_steps(&ranked.industry),
                self.scoring.max_first_steps,
            ),
        }
    }
}

/// Positive themes sorted by score, ties in catalog order
fn rank_themes(themes: &[ThemeScore]) -> Vec<ThemeScore> {
    let mut ranked = themes.to_vec();
    ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
    ranked
}

fn take_owned(items: &[String], limit: usize) -> Vec<String> {
    items.iter().take(limit).cloned().collect()
}
