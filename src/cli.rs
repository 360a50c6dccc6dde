//! CLI interface for the career compass

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "career-compass")]
#[command(about = "Suggest career directions from what you are good at and what you enjoy")]
#[command(long_about = "Score free-text answers about strengths and interests against an industry catalog, \
and explain the top recommendations with evidence, themes and first steps")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze strengths and interests
    Analyze {
        /// What you are good at
        #[arg(long)]
        strength: Option<String>,

        /// What you enjoy or want to do
        #[arg(long)]
        interest: Option<String>,

        /// Read the strength answer from a file (TXT, MD, PDF)
        #[arg(long)]
        strength_file: Option<PathBuf>,

        /// Read the interest answer from a file (TXT, MD, PDF)
        #[arg(long)]
        interest_file: Option<PathBuf>,

        /// Supporting document added to the interest answer; repeatable
        #[arg(short, long = "file")]
        files: Vec<PathBuf>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file; a directory gets a timestamped file name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include raw and per-theme scores
        #[arg(short, long)]
        detailed: bool,

        /// Catalog TOML to use instead of the configured one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Inspect the recommendation catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,

        /// Catalog TOML to use instead of the configured one
        #[arg(long, global = true)]
        catalog: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List industries and themes
    List,

    /// Show one industry or theme
    Show {
        /// Industry name or theme key
        name: String,
    },

    /// Validate the catalog and report influence targets that match no industry
    Check,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "career-compass",
            "analyze",
            "--strength",
            "データ分析",
            "--interest",
            "教育",
            "-f",
            "a.md",
            "--file",
            "b.pdf",
            "-o",
            "json",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze {
                strength,
                interest,
                files,
                output,
                detailed,
                ..
            } => {
                assert_eq!(strength.as_deref(), Some("データ分析"));
                assert_eq!(interest.as_deref(), Some("教育"));
                assert_eq!(files, vec![PathBuf::from("a.md"), PathBuf::from("b.pdf")]);
                assert_eq!(output.as_deref(), Some("json"));
                assert!(!detailed);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_catalog_show() {
        let cli = Cli::try_parse_from(["career-compass", "catalog", "show", "教育・研修"]).unwrap();
        match cli.command {
            Commands::Catalog {
                action: CatalogAction::Show { name },
                catalog,
            } => {
                assert_eq!(name, "教育・研修");
                assert!(catalog.is_none());
            }
            _ => panic!("expected catalog show"),
        }
    }
}
