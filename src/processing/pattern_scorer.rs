//! Pattern hit counting with captured evidence

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of running a pattern set over one text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternHits {
    /// Every non-overlapping match, repeats included
    pub count: usize,
    /// Distinct matched substrings in first-seen order
    pub evidence: Vec<String>,
}

/// Per-entry scoring record for one analysis call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvidence {
    pub strength_hits: usize,
    pub interest_hits: usize,
    pub strength_evidence: Vec<String>,
    pub interest_evidence: Vec<String>,
    /// `strength_hits * strength_weight + interest_hits * interest_weight`
    pub score: f64,
}

/// Count all non-overlapping matches of each pattern in `text`.
pub fn score_patterns(patterns: &[Regex], text: &str) -> PatternHits {
    let mut count = 0;
    let mut matched = Vec::new();

    for pattern in patterns {
        for m in pattern.find_iter(text) {
            count += 1;
            matched.push(m.as_str());
        }
    }

    PatternHits {
        count,
        evidence: dedup_preserving_order(matched),
    }
}

/// Drop repeated entries, keeping the first occurrence of each
pub fn dedup_preserving_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for item in items {
        let item = item.as_ref();
        if seen.insert(item.to_string()) {
            unique.push(item.to_string());
        }
    }
    unique
}

impl ScoreEvidence {
    /// Score one pattern set against both normalized answers
    pub fn collect(
        patterns: &[Regex],
        strength_text: &str,
        interest_text: &str,
        strength_weight: f64,
        interest_weight: f64,
    ) -> Self {
        let strength = score_patterns(patterns, strength_text);
        let interest = score_patterns(patterns, interest_text);
        let score = strength.count as f64 * strength_weight + interest.count as f64 * interest_weight;

        Self {
            strength_hits: strength.count,
            interest_hits: interest.count,
            strength_evidence: strength.evidence,
            interest_evidence: interest.evidence,
            score,
        }
    }

    pub fn has_signal(&self) -> bool {
        self.score > 0.0
    }

    /// Strength evidence followed by interest evidence, without repeats
    pub fn combined_evidence(&self) -> Vec<String> {
        dedup_preserving_order(self.strength_evidence.iter().chain(&self.interest_evidence))
    }
}
