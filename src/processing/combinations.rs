//! Cross-industry "multiplier" suggestions

use crate::catalog::CombinationRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationSuggestion {
    pub label: String,
    pub roles: Vec<String>,
    pub why: String,
}

/// Fire every rule whose required industries all appear in `top_industries`.
/// Rules are independent; output follows rule order.
pub fn evaluate_combinations<S: AsRef<str>>(
    rules: &[CombinationRule],
    top_industries: &[S],
) -> Vec<CombinationSuggestion> {
    rules
        .iter()
        .filter(|rule| {
            rule.requires
                .iter()
                .all(|required| top_industries.iter().any(|name| name.as_ref() == required.as_str()))
        })
        .map(|rule| CombinationSuggestion {
            label: rule.label.clone(),
            roles: rule.roles.clone(),
            why: rule.why.clone(),
        })
        .collect()
}
