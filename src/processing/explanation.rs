//! Natural-language reasons and the reflection summary

use crate::catalog::Catalog;
use crate::config::ScoringConfig;
use crate::processing::pattern_scorer::dedup_preserving_order;
use crate::processing::pipeline::ThemeScore;
use serde::{Deserialize, Serialize};

const SPARSE_WORK_STYLE: &str =
    "文章量が少ないか、テーマの傾向が未検出でした。もう少し具体例を追加してください。";

const SPARSE_REFLECTIONS: [&str; 2] = [
    "最近うまくいった/楽しかった活動は？ その中で何をしていたか。",
    "これから伸ばしたい場面は？ 学び方は？",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub dominant_themes: Vec<String>,
    pub work_style: String,
    pub reflection_questions: Vec<String>,
    pub evidence: Vec<ThemeEvidence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeEvidence {
    pub theme: String,
    pub keywords: Vec<String>,
}

/// Templated explanation for one recommended industry. Sentences for
/// keywords and themes are left out when there is nothing to say.
pub fn build_reason(
    industry: &str,
    keywords: &[String],
    dominant_themes: &[String],
    keyword_limit: usize,
) -> String {
    let mut parts = vec![format!("{}を候補に挙げます。", industry)];

    let quoted: Vec<&str> = keywords.iter().take(keyword_limit).map(String::as_str).collect();
    if !quoted.is_empty() {
        parts.push(format!(
            "回答に「{}」といった語があり、仕事内容との接点が見られます。",
            quoted.join("、")
        ));
    }

    if !dominant_themes.is_empty() {
        parts.push(format!(
            "特に「{}」の傾向が強く、活躍の土台になりやすいと考えられます。",
            dominant_themes.join("・")
        ));
    }

    parts.join(" ")
}

/// Summarize the strongest themes. `ranked_themes` holds only themes with a
/// positive score, strongest first.
pub fn build_summary(catalog: &Catalog, ranked_themes: &[ThemeScore], scoring: &ScoringConfig) -> Summary {
    if ranked_themes.is_empty() {
        return Summary {
            dominant_themes: Vec::new(),
            work_style: SPARSE_WORK_STYLE.to_string(),
            reflection_questions: SPARSE_REFLECTIONS.iter().map(|q| q.to_string()).collect(),
            evidence: Vec::new(),
        };
    }

    let top = &ranked_themes[..ranked_themes.len().min(scoring.dominant_theme_count)];

    let mut styles = Vec::new();
    let mut reflections = Vec::new();
    for theme_score in top {
        if let Some(theme) = catalog.theme(&theme_score.theme) {
            styles.extend(theme.suited_styles.iter().take(scoring.style_entries_per_theme));
            reflections.extend(theme.reflection.iter().take(scoring.reflections_per_theme).cloned());
        }
    }

    Summary {
        dominant_themes: top.iter().map(|t| t.theme.clone()).collect(),
        work_style: dedup_preserving_order(styles).join(" / "),
        reflection_questions: reflections,
        evidence: top
            .iter()
            .map(|t| ThemeEvidence {
                theme: t.theme.clone(),
                keywords: t.evidence.combined_evidence(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::pattern_scorer::ScoreEvidence;

    fn theme_score(theme: &str, evidence: &[&str], score: f64) -> ThemeScore {
        ThemeScore {
            theme: theme.to_string(),
            evidence: ScoreEvidence {
                strength_hits: evidence.len(),
                interest_hits: 0,
                strength_evidence: evidence.iter().map(|e| e.to_string()).collect(),
                interest_evidence: Vec::new(),
                score,
            },
        }
    }

    #[test]
    fn test_reason_with_everything() {
        let keywords: Vec<String> = ["a", "b", "c", "d", "e", "f", "g"].iter().map(|s| s.to_string()).collect();
        let themes = vec!["改善・探究".to_string(), "支援・共感".to_string()];
        let reason = build_reason("IT・ソフトウェア", &keywords, &themes, 5);

        assert_eq!(
            reason,
            "IT・ソフトウェアを候補に挙げます。 回答に「a、b、c、d、e」といった語があり、仕事内容との接点が見られます。 \
             特に「改善・探究・支援・共感」の傾向が強く、活躍の土台になりやすいと考えられます。"
        );
    }

    #[test]
    fn test_reason_omits_missing_sentences() {
        let reason = build_reason("販売・サービス", &[], &[], 5);
        assert_eq!(reason, "販売・サービスを候補に挙げます。");

        let reason = build_reason("販売・サービス", &[], &["対人フロント".to_string()], 5);
        assert!(!reason.contains("回答に"));
        assert!(reason.contains("「対人フロント」"));
    }

    #[test]
    fn test_sparse_summary() {
        let catalog = Catalog::builtin().unwrap();
        let summary = build_summary(&catalog, &[], &ScoringConfig::default());

        assert!(summary.dominant_themes.is_empty());
        assert_eq!(summary.work_style, SPARSE_WORK_STYLE);
        assert_eq!(summary.reflection_questions.len(), 2);
        assert!(summary.evidence.is_empty());
    }

    #[test]
    fn test_summary_top_two_themes() {
        let catalog = Catalog::builtin().unwrap();
        let ranked = vec![
            theme_score("改善・探究", &["分析", "自動化"], 2.4),
            theme_score("支援・共感", &["支援"], 1.2),
            theme_score("堅実・正確", &["正確"], 1.2),
        ];
        let summary = build_summary(&catalog, &ranked, &ScoringConfig::default());

        assert_eq!(summary.dominant_themes, vec!["改善・探究", "支援・共感"]);
        assert_eq!(
            summary.work_style,
            "課題解決型の業務 / 継続的改善の役割 / 対人支援 / 少人数の深い関わり"
        );
        assert_eq!(
            summary.reflection_questions,
            vec!["どんな課題を解くと没頭できるか", "誰のどんな変化を支えたいか"]
        );
        assert_eq!(summary.evidence.len(), 2);
        assert_eq!(summary.evidence[0].keywords, vec!["分析", "自動化"]);
    }

    #[test]
    fn test_work_style_dedups_shared_entries() {
        let catalog = Catalog::from_toml_str(
            r#"
[fallback]
industry = "x"

[[industries]]
name = "x"
patterns = ['x']

[[themes]]
key = "one"
patterns = ['1']
suited_styles = ["quiet", "remote"]
reflection = ["q1"]

[[themes]]
key = "two"
patterns = ['2']
suited_styles = ["remote", "flexible"]
reflection = ["q2"]
"#,
        )
        .unwrap();
        let ranked = vec![theme_score("one", &["1"], 1.0), theme_score("two", &["2"], 1.0)];
        let summary = build_summary(&catalog, &ranked, &ScoringConfig::default());

        assert_eq!(summary.work_style, "quiet / remote / flexible");
        assert_eq!(summary.reflection_questions, vec!["q1", "q2"]);
    }
}
