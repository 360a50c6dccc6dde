//! Career compass: strength and interest based career suggestions

use anyhow::{Context, Result};
use career_compass::catalog::Catalog;
use career_compass::cli::{self, CatalogAction, Cli, Commands, ConfigAction};
use career_compass::input::InputManager;
use career_compass::output::{save_report_to_file, AnalysisReport, DocumentDigest, ReportGenerator, ReportMetadata};
use career_compass::processing::RecommendationEngine;
use career_compass::{CompassError, Config};
use clap::Parser;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            strength,
            interest,
            strength_file,
            interest_file,
            files,
            output,
            save,
            detailed,
            catalog,
        } => {
            let started = Instant::now();

            let format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(CompassError::InvalidInput)?,
                None => config.output.format,
            };

            let (catalog, catalog_source) = load_catalog(catalog.as_deref(), &config)?;
            let mut input_manager = InputManager::new(config.input.clone());

            let mut strength_text = strength.unwrap_or_default();
            if let Some(path) = &strength_file {
                let text = input_manager
                    .extract_text(path)
                    .await
                    .with_context(|| format!("Failed to read strength file {}", path.display()))?;
                append_text(&mut strength_text, &text);
            }

            let mut interest_text = interest.unwrap_or_default();
            if let Some(path) = &interest_file {
                let text = input_manager
                    .extract_text(path)
                    .await
                    .with_context(|| format!("Failed to read interest file {}", path.display()))?;
                append_text(&mut interest_text, &text);
            }

            let documents = if files.is_empty() {
                None
            } else {
                println!("📂 Extracting text from {} document(s)...", files.len());
                let documents = input_manager.extract_documents(&files).await?;
                if documents.is_empty() {
                    warn!("No text could be extracted from the given documents");
                }
                append_text(&mut interest_text, &documents.text);
                Some(documents)
            };

            if strength_text.trim().is_empty() && interest_text.trim().is_empty() {
                warn!("No strength or interest text given; only the fallback suggestion is possible");
            }

            info!("Analyzing with catalog: {}", catalog_source);
            let engine = RecommendationEngine::new(catalog, config.scoring.clone())?;
            let result = engine.analyze(&strength_text, &interest_text);

            let metadata = ReportMetadata::new(catalog_source, started.elapsed().as_millis() as u64);
            let mut report = AnalysisReport::new(result, metadata);
            if let Some(documents) = &documents {
                report = report.with_documents(DocumentDigest::from_documents(
                    documents,
                    config.input.preview_chars,
                ));
            }

            let mut output_config = config.output.clone();
            output_config.detailed |= detailed;
            let content = ReportGenerator::from_config(&output_config).generate_report(&report, format)?;

            match save {
                Some(path) => {
                    let written = save_report_to_file(&content, &path, format)
                        .with_context(|| format!("Failed to save report to {}", path.display()))?;
                    println!("💾 Report saved to {}", written.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Catalog { action, catalog } => {
            let (catalog, catalog_source) = load_catalog(catalog.as_deref(), &config)?;
            match action {
                CatalogAction::List => {
                    println!("📚 Catalog: {}", catalog_source);
                    println!("\n🏢 Industries:");
                    for (i, industry) in catalog.industries().iter().enumerate() {
                        let marker = if industry.name == catalog.fallback_industry() {
                            " (fallback)"
                        } else {
                            ""
                        };
                        println!("  {}. {}{}", i + 1, industry.name, marker);
                    }
                    println!("\n🎨 Themes:");
                    for theme in catalog.themes() {
                        println!("  • {}: {}", theme.key, theme.description);
                    }
                }
                CatalogAction::Show { name } => show_catalog_entry(&catalog, &name)?,
                CatalogAction::Check => {
                    println!("✅ Catalog OK: {}", catalog_source);
                    println!(
                        "  {} industries, {} themes, {} combination rules",
                        catalog.industries().len(),
                        catalog.themes().len(),
                        catalog.combinations().len()
                    );
                    let dangling = catalog.dangling_influence_targets();
                    if dangling.is_empty() {
                        println!("  All influence targets are catalogued");
                    } else {
                        println!("⚠️  Influence targets with no matching industry (ignored when scoring):");
                        for edge in dangling {
                            println!("  {} -> {}", edge.theme, edge.industry);
                        }
                    }
                }
            }
        }

        Commands::Config { action } => {
            let path = config_path.clone().unwrap_or_else(Config::config_path);
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    println!("📋 Configuration ({})", path.display());
                    let content = toml::to_string_pretty(&config).context("Failed to render configuration")?;
                    println!("{}", content);
                }
                ConfigAction::Reset => {
                    match &config_path {
                        Some(custom) => Config::default().save_to(custom)?,
                        None => Config::default().save()?,
                    }
                    println!("🔄 Configuration reset to defaults: {}", path.display());
                }
                ConfigAction::Path => println!("{}", path.display()),
            }
        }
    }

    Ok(())
}

/// CLI path wins over the configured path; the bundled catalog is the default
fn load_catalog(cli_path: Option<&Path>, config: &Config) -> Result<(Arc<Catalog>, String)> {
    let path = cli_path.or(config.catalog.path.as_deref());
    let (catalog, source) = match path {
        Some(path) => (
            Catalog::from_file(path).with_context(|| format!("Failed to load catalog {}", path.display()))?,
            path.display().to_string(),
        ),
        None => (Catalog::builtin()?, "builtin".to_string()),
    };
    Ok((Arc::new(catalog), source))
}

fn show_catalog_entry(catalog: &Catalog, name: &str) -> Result<()> {
    if let Some(industry) = catalog.industry(name) {
        println!("🏢 {}", industry.name);
        println!("  Patterns: {}", industry.patterns.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(" , "));
        println!("  Roles: {}", industry.roles.join(" / "));
        println!("  Typical tasks: {}", industry.typical_tasks.join(" / "));
        println!("  Values: {}", industry.values_fit.join(" / "));
        println!("  Adjacent: {}", catalog.adjacent_fields(name).join(" / "));
        println!("  First steps:");
        for step in catalog.first_steps(name) {
            println!("    • {}", step);
        }
        let influenced_by: Vec<String> = catalog
            .influence()
            .iter()
            .filter_map(|(theme, targets)| targets.get(name).map(|w| format!("{} ({})", theme, w)))
            .collect();
        if !influenced_by.is_empty() {
            println!("  Boosted by themes: {}", influenced_by.join(", "));
        }
        return Ok(());
    }

    if let Some(theme) = catalog.theme(name) {
        println!("🎨 {}", theme.key);
        println!("  {}", theme.description);
        println!("  Patterns: {}", theme.patterns.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(" , "));
        println!("  Suited styles: {}", theme.suited_styles.join(" / "));
        for question in &theme.reflection {
            println!("  ? {}", question);
        }
        if let Some(targets) = catalog.influence().get(name) {
            for (industry, weight) in targets {
                println!("  -> {} x{}", industry, weight);
            }
        }
        return Ok(());
    }

    Err(CompassError::InvalidInput(format!("No industry or theme named '{}'", name)).into())
}

fn append_text(target: &mut String, extra: &str) {
    if extra.trim().is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(extra);
}
