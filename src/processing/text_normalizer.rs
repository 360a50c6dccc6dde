//! Text normalization applied before any pattern matching

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Canonicalize free text for matching: NFKC compatibility composition,
/// lowercasing and whitespace collapsing. Total over all inputs and
/// idempotent.
///
/// Full-width ASCII such as `ＰＹＴＨＯＮ` becomes `python`, half-width
/// katakana becomes full-width.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // lowercase output is not always NFKC-stable
    let folded: String = text.nfkc().collect::<String>().to_lowercase().nfkc().collect();

    WHITESPACE.replace_all(&folded, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "データ分析と業務の自動化が得意です",
        "ＰＹＴＨＯＮ と　ＳＱＬ",
        "ｶﾀｶﾅ\tと\n\n改行",
        "  Mixed CASE  Text \u{3000} with ideographic space ",
        "①②③ ㈱ ﬁ",
        "İstanbul ΣΊΣΥΦΟΣ",
        "e\u{301}cole",
    ];

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  \n\t "), "");
    }

    #[test]
    fn test_full_width_and_case() {
        assert_eq!(normalize("ＰＹＴＨＯＮ と　ＳＱＬ"), "python と sql");
        assert_eq!(normalize("Web API"), "web api");
    }

    #[test]
    fn test_half_width_katakana() {
        assert_eq!(normalize("ﾃﾞｰﾀ"), "データ");
    }

    #[test]
    fn test_whitespace_collapsing() {
        assert_eq!(normalize("  a \t\n b\u{3000}\u{3000}c  "), "a b c");
    }

    #[test]
    fn test_idempotent() {
        for sample in SAMPLES {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
