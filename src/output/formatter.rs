//! Output formatters: console, JSON, Markdown and HTML

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{CompassError, Result};
use crate::output::report::AnalysisReport;
use crate::processing::pipeline::Recommendation;
use askama::Template;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
}

/// Terminal output with optional colors and a detailed score section
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Dispatches a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>キャリア診断レポート</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Hiragino Sans', 'Noto Sans JP', sans-serif;
            line-height: 1.7;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            margin-bottom: 30px;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        .section { margin: 25px 0; }
        .section h2 {
            color: #007acc;
            border-bottom: 1px solid #dee2e6;
            padding-bottom: 6px;
        }
        .card {
            border-left: 4px solid #007acc;
            background: #f1f7fc;
            padding: 12px 18px;
            margin: 14px 0;
            border-radius: 4px;
        }
        .score { color: #6c757d; font-size: 0.9em; }
        .keyword {
            display: inline-block;
            background: #e9ecef;
            border-radius: 12px;
            padding: 2px 10px;
            margin: 2px;
        }
        .combination { border-left-color: #28a745; background: #f0f9f2; }
        table { border-collapse: collapse; width: 100%; }
        th, td { border-bottom: 1px solid #dee2e6; padding: 6px; text-align: left; }
        .metadata {
            margin-top: 30px;
            font-size: 0.85em;
            color: #6c757d;
        }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>🧭 キャリア診断レポート</h1>
            <p>{{ generated_at }}</p>
        </div>

        <div class="section">
            <h2>傾向のまとめ</h2>
            {% if has_themes %}
            <p><strong>主なテーマ:</strong> {{ dominant_themes }}</p>
            {% endif %}
            <p><strong>向いている働き方:</strong> {{ work_style }}</p>
            <ul>
                {% for question in reflection_questions %}
                <li>{{ question }}</li>
                {% endfor %}
            </ul>
        </div>

        <div class="section">
            <h2>おすすめの分野</h2>
            {% for rec in recommendations %}
            <div class="card">
                <h3>{{ rec.rank }}. {{ rec.industry }} <span class="score">(score {{ rec.score }})</span></h3>
                <p>{{ rec.reason }}</p>
                {% if rec.has_keywords %}
                <p>
                    {% for keyword in rec.keywords %}<span class="keyword">{{ keyword }}</span>{% endfor %}
                </p>
                {% endif %}
                <p><strong>職種例:</strong> {{ rec.roles }}</p>
                <p><strong>主な業務:</strong> {{ rec.tasks }}</p>
                <p><strong>大切にしたい価値観:</strong> {{ rec.values }}</p>
                <p><strong>隣接分野:</strong> {{ rec.adjacent }}</p>
                <p><strong>最初の一歩:</strong></p>
                <ol>
                    {% for step in rec.first_steps %}
                    <li>{{ step }}</li>
                    {% endfor %}
                </ol>
            </div>
            {% endfor %}
        </div>

        {% if has_combinations %}
        <div class="section">
            <h2>掛け合わせの提案</h2>
            {% for combo in combinations %}
            <div class="card combination">
                <h3>{{ combo.label }}</h3>
                <p><strong>職種例:</strong> {{ combo.roles }}</p>
                <p>{{ combo.why }}</p>
            </div>
            {% endfor %}
        </div>
        {% endif %}

        {% if has_documents %}
        <div class="section">
            <h2>読み込んだ資料</h2>
            <table>
                <tr><th>ファイル</th><th>種類</th><th>文字数</th><th>状態</th></tr>
                {% for doc in documents %}
                <tr><td>{{ doc.path }}</td><td>{{ doc.file_type }}</td><td>{{ doc.chars }}</td><td>{{ doc.status }}</td></tr>
                {% endfor %}
            </table>
        </div>
        {% endif %}

        <div class="metadata">
            <p><strong>Generated by career-compass v{{ version }}</strong> | catalog: {{ catalog_source }} | {{ processing_time }}ms</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    has_themes: bool,
    dominant_themes: String,
    work_style: String,
    reflection_questions: Vec<String>,
    recommendations: Vec<HtmlRecommendation>,
    has_combinations: bool,
    combinations: Vec<HtmlCombination>,
    has_documents: bool,
    documents: Vec<HtmlDocument>,
    version: String,
    catalog_source: String,
    processing_time: u64,
}

struct HtmlRecommendation {
    rank: usize,
    industry: String,
    score: String,
    reason: String,
    has_keywords: bool,
    keywords: Vec<String>,
    roles: String,
    tasks: String,
    values: String,
    adjacent: String,
    first_steps: Vec<String>,
}

struct HtmlCombination {
    label: String,
    roles: String,
    why: String,
}

struct HtmlDocument {
    path: String,
    file_type: String,
    chars: usize,
    status: String,
}

fn format_timestamp(report: &AnalysisReport) -> String {
    report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_recommendation(&self, index: usize, rec: &Recommendation) -> String {
        let mut output = self.format_header(&format!("{}. {}", index + 1, rec.industry), 3);
        output.push_str(&format!("score: {:.2}\n", rec.score));
        output.push_str(&format!("{}\n", rec.reason));
        if !rec.evidence_keywords.is_empty() {
            output.push_str(&format!(
                "🔍 根拠: {}\n",
                self.colorize(&rec.evidence_keywords.join(", "), Color::Cyan)
            ));
        }
        output.push_str(&format!("💼 職種例: {}\n", rec.roles.join(" / ")));
        output.push_str(&format!("📋 主な業務: {}\n", rec.typical_tasks.join(" / ")));
        output.push_str(&format!("💎 価値観: {}\n", rec.fit_values.join(" / ")));
        output.push_str(&format!("🧩 隣接分野: {}\n", rec.adjacent_fields.join(" / ")));
        if !rec.first_steps.is_empty() {
            output.push_str("🚀 最初の一歩:\n");
            for step in &rec.first_steps {
                output.push_str(&format!("  • {}\n", step));
            }
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str(&self.format_header("🧭 CAREER COMPASS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            format_timestamp(report),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("傾向のまとめ", 2));
        if !result.summary.dominant_themes.is_empty() {
            output.push_str(&format!(
                "主なテーマ: {}\n",
                self.colorize(&result.summary.dominant_themes.join("・"), Color::Magenta)
            ));
        }
        output.push_str(&format!("向いている働き方: {}\n", result.summary.work_style));
        for question in &result.summary.reflection_questions {
            output.push_str(&format!("  ? {}\n", question));
        }

        output.push_str(&self.format_header("おすすめの分野", 2));
        for (i, rec) in result.recommendations.iter().enumerate() {
            output.push_str(&self.format_recommendation(i, rec));
        }

        if !result.combination_suggestions.is_empty() {
            output.push_str(&self.format_header("掛け合わせの提案", 2));
            for combo in &result.combination_suggestions {
                output.push_str(&format!(
                    "✨ {} ({})\n   {}\n",
                    self.colorize(&combo.label, Color::Green),
                    combo.roles.join(" / "),
                    combo.why
                ));
            }
        }

        if let Some(documents) = &report.documents {
            output.push_str(&self.format_header("読み込んだ資料", 2));
            for source in &documents.sources {
                output.push_str(&format!(
                    "  📄 {} [{}] {} chars, {}\n",
                    source.path, source.file_type, source.chars, source.status
                ));
            }
            if documents.truncated {
                output.push_str(&self.colorize("  (text truncated)\n", Color::Yellow));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Detailed Scores", 2));
            for ranked in &result.raw_scores {
                output.push_str(&format!("  {:<24} {:>6.2}\n", ranked.industry, ranked.score));
            }

            output.push_str(&self.format_header("Industry breakdown", 3));
            for industry in &result.details.industries {
                output.push_str(&format!(
                    "  {}: strength {} / interest {} hits, base {:.2} + theme {:.2}\n",
                    industry.industry,
                    industry.evidence.strength_hits,
                    industry.evidence.interest_hits,
                    industry.evidence.score,
                    industry.theme_bonus
                ));
            }

            if !result.details.themes.is_empty() {
                output.push_str(&self.format_header("Theme scores", 3));
                for theme in &result.details.themes {
                    output.push_str(&format!(
                        "  {}: {:.2} ({})\n",
                        theme.theme,
                        theme.evidence.score,
                        theme.evidence.combined_evidence().join(", ")
                    ));
                }
            }
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str("# 🧭 キャリア診断レポート\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Catalog:** `{}`\n\n",
                format_timestamp(report),
                report.metadata.processing_time_ms,
                report.metadata.catalog_source
            ));
        }

        output.push_str("## 傾向のまとめ\n\n");
        if !result.summary.dominant_themes.is_empty() {
            output.push_str(&format!(
                "**主なテーマ:** {}\n\n",
                result.summary.dominant_themes.join("・")
            ));
        }
        output.push_str(&format!("**向いている働き方:** {}\n\n", result.summary.work_style));
        for question in &result.summary.reflection_questions {
            output.push_str(&format!("- {}\n", question));
        }
        output.push('\n');

        output.push_str("## おすすめの分野\n\n");
        for (i, rec) in result.recommendations.iter().enumerate() {
            output.push_str(&format!("### {}. {} (score {:.2})\n\n", i + 1, rec.industry, rec.score));
            output.push_str(&format!("{}\n\n", rec.reason));
            if !rec.evidence_keywords.is_empty() {
                let quoted: Vec<String> = rec.evidence_keywords.iter().map(|k| format!("`{}`", k)).collect();
                output.push_str(&format!("**根拠:** {}\n\n", quoted.join(" ")));
            }
            output.push_str("| 項目 | 内容 |\n|------|------|\n");
            output.push_str(&format!("| 職種例 | {} |\n", rec.roles.join(" / ")));
            output.push_str(&format!("| 主な業務 | {} |\n", rec.typical_tasks.join(" / ")));
            output.push_str(&format!("| 価値観 | {} |\n", rec.fit_values.join(" / ")));
            output.push_str(&format!("| 隣接分野 | {} |\n\n", rec.adjacent_fields.join(" / ")));
            if !rec.first_steps.is_empty() {
                output.push_str("**最初の一歩:**\n\n");
                for (n, step) in rec.first_steps.iter().enumerate() {
                    output.push_str(&format!("{}. {}\n", n + 1, step));
                }
                output.push('\n');
            }
        }

        if !result.combination_suggestions.is_empty() {
            output.push_str("## 掛け合わせの提案\n\n");
            for combo in &result.combination_suggestions {
                output.push_str(&format!("### {}\n\n", combo.label));
                output.push_str(&format!("- **職種例:** {}\n", combo.roles.join(" / ")));
                output.push_str(&format!("- {}\n\n", combo.why));
            }
        }

        if let Some(documents) = &report.documents {
            output.push_str("## 読み込んだ資料\n\n");
            output.push_str("| ファイル | 種類 | 文字数 | 状態 |\n|------|------|------|------|\n");
            for source in &documents.sources {
                output.push_str(&format!(
                    "| `{}` | {} | {} | {} |\n",
                    source.path, source.file_type, source.chars, source.status
                ));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "---\n*Generated by career-compass v{}*\n",
            report.metadata.version
        ));

        Ok(output)
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        let result = &report.result;

        let recommendations = result
            .recommendations
            .iter()
            .enumerate()
            .map(|(i, rec)| HtmlRecommendation {
                rank: i + 1,
                industry: rec.industry.clone(),
                score: format!("{:.2}", rec.score),
                reason: rec.reason.clone(),
                has_keywords: !rec.evidence_keywords.is_empty(),
                keywords: rec.evidence_keywords.clone(),
                roles: rec.roles.join(" / "),
                tasks: rec.typical_tasks.join(" / "),
                values: rec.fit_values.join(" / "),
                adjacent: rec.adjacent_fields.join(" / "),
                first_steps: rec.first_steps.clone(),
            })
            .collect();

        let combinations: Vec<HtmlCombination> = result
            .combination_suggestions
            .iter()
            .map(|combo| HtmlCombination {
                label: combo.label.clone(),
                roles: combo.roles.join(" / "),
                why: combo.why.clone(),
            })
            .collect();

        let documents: Vec<HtmlDocument> = report
            .documents
            .iter()
            .flat_map(|digest| &digest.sources)
            .map(|source| HtmlDocument {
                path: source.path.clone(),
                file_type: source.file_type.to_string(),
                chars: source.chars,
                status: source.status.to_string(),
            })
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: format_timestamp(report),
            has_themes: !result.summary.dominant_themes.is_empty(),
            dominant_themes: result.summary.dominant_themes.join("・"),
            work_style: result.summary.work_style.clone(),
            reflection_questions: result.summary.reflection_questions.clone(),
            recommendations,
            has_combinations: !combinations.is_empty(),
            combinations,
            has_documents: report.documents.is_some(),
            documents,
            version: report.metadata.version.clone(),
            catalog_source: report.metadata.catalog_source.clone(),
            processing_time: report.metadata.processing_time_ms,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| CompassError::OutputFormatting(e.to_string()))
    }
}

impl ReportGenerator {
    pub fn from_config(output: &OutputConfig) -> Self {
        Self::with_options(output.color_output, output.detailed, output.pretty_json, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

/// Write `content` to `target`. An existing directory gets a timestamped
/// file named after the format. Returns the path written.
pub fn save_report_to_file(content: &str, target: &Path, format: OutputFormat) -> Result<PathBuf> {
    let file_path = if target.is_dir() {
        target.join(suggest_filename(format, true))
    } else {
        target.to_path_buf()
    };

    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file_path, content)?;
    Ok(file_path)
}

fn suggest_filename(format: OutputFormat, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };

    format!("career_compass{}.{}", timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::ScoringConfig;
    use crate::input::{DocumentSource, DocumentStatus, FileType};
    use crate::output::report::{DocumentDigest, ReportMetadata};
    use crate::processing::RecommendationEngine;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn sample_report() -> AnalysisReport {
        let engine = RecommendationEngine::new(Arc::new(Catalog::builtin().unwrap()), ScoringConfig::default()).unwrap();
        let result = engine.analyze("データ分析と業務の自動化が得意です", "研修の企画");
        AnalysisReport::new(result, ReportMetadata::new("builtin", 3)).with_documents(DocumentDigest {
            sources: vec![DocumentSource {
                path: "notes.md".to_string(),
                file_type: FileType::Markdown,
                chars: 12,
                status: DocumentStatus::Extracted,
            }],
            text_preview: "研修の企画".to_string(),
            truncated: false,
        })
    }

    #[test]
    fn test_console_plain() {
        let report = sample_report();
        let output = ConsoleFormatter::new(false, false).format_report(&report).unwrap();

        assert!(output.contains("█ 🧭 CAREER COMPASS"));
        assert!(output.contains("1. IT・ソフトウェア"));
        assert!(output.contains("notes.md [markdown] 12 chars, extracted"));
        assert!(!output.contains("Detailed Scores"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_console_detailed() {
        let report = sample_report();
        let output = ConsoleFormatter::new(false, true).format_report(&report).unwrap();
        assert!(output.contains("Detailed Scores"));
        assert!(output.contains("Theme scores"));
        assert!(output.contains("改善・探究"));
    }

    #[test]
    fn test_json_round_trips() {
        let report = sample_report();
        let json = JsonFormatter::new(false).format_report(&report).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.result.recommendations.len(), report.result.recommendations.len());
        assert_eq!(parsed.result.summary, report.result.summary);
        assert_eq!(parsed.metadata.catalog_source, "builtin");
        assert!(parsed.documents.is_some());
        assert!(!json.contains('\n'));
    }

    #[test]
    fn test_markdown_sections() {
        let report = sample_report();
        let output = MarkdownFormatter::new(true).format_report(&report).unwrap();
        assert!(output.starts_with("# 🧭 キャリア診断レポート"));
        assert!(output.contains("## おすすめの分野"));
        assert!(output.contains("**Catalog:** `builtin`"));
        assert!(output.contains("| `notes.md` | markdown | 12 | extracted |"));
    }

    #[test]
    fn test_html_escapes_content() {
        let mut report = sample_report();
        report.result.recommendations[0].reason = "<b>raw</b>".to_string();

        let html = HtmlFormatter::new(false).format_report(&report).unwrap();
        assert!(!html.contains("<b>raw</b>"));
        assert!(!html.contains("<style>"));
        assert!(html.contains("IT・ソフトウェア"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, true, true, true);
        let report = sample_report();

        let json = generator.generate_report(&report, OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));
        let html = generator.generate_report(&report, OutputFormat::Html).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_save_to_file_path() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out").join("report.md");
        let written = save_report_to_file("# report", &target, OutputFormat::Markdown).unwrap();

        assert_eq!(written, target);
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "# report");
    }

    #[test]
    fn test_save_into_directory_names_file() {
        let dir = tempdir().unwrap();
        let written = save_report_to_file("<html></html>", dir.path(), OutputFormat::Html).unwrap();

        assert_eq!(written.parent(), Some(dir.path()));
        let name = written.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("career_compass_"));
        assert!(name.ends_with(".html"));
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "<html></html>");
        assert_eq!(suggest_filename(OutputFormat::Json, false), "career_compass.json");
    }
}
