//! skucurate CLI
//!
//! Curates canonical SKU names from noisy aliases and merges reviewed
//! curations into the versioned seed table

mod config;
mod progress;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use skucurate_core::seed::parse_date;
use skucurate_core::{CurationDecisionEngine, CurationDetail, Pipeline, SeedMerger, SeedVersion};
use skucurate_formats::{
    export_file_name, load_alias_groups, read_overrides, read_seed, write_curation_export,
    write_seed,
};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::CurationConfig;
use progress::ProgressReporter;

#[derive(Parser)]
#[command(name = "skucurate")]
#[command(version, about = "Curate canonical SKU names and maintain the seed table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output statistics in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Curate every SKU group and write a dated curation export
    Export {
        /// Candidate table (CSV or JSONL) with sku_id and item_description
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory for the export [default: data/intermediate/curation_exports]
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Config file (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Date tag for the file name, YYYY-MM-DD [default: today]
        #[arg(long)]
        date: Option<String>,
    },

    /// Merge a reviewed export into the seed table
    GenerateSeed {
        /// Reviewed export with sku_id, final_sku_name and decision
        #[arg(value_name = "APPROVED")]
        approved: PathBuf,

        /// Existing seed [default: dbt/seeds/ref_sku_names.csv]
        #[arg(long)]
        seed_path: Option<PathBuf>,

        /// Where to write the merged seed [default: the seed path]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Explicit version tag such as v0.3 [default: bump the highest minor]
        #[arg(long)]
        version: Option<String>,

        /// Effective-from date, YYYY-MM-DD [default: today]
        #[arg(long)]
        effective_from: Option<String>,

        /// Config file (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show how one SKU group is curated
    Explain {
        /// Candidate table (CSV or JSONL)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// SKU to explain
        #[arg(long)]
        sku: String,

        /// Config file (YAML or TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default config file to edit
    InitConfig {
        /// Destination (.yaml, .yml or .toml)
        #[arg(value_name = "PATH", default_value = "skucurate.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(!cli.json) // Disable colors if JSON output
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Export {
            input,
            output_dir,
            config,
            date,
        } => {
            export(input, output_dir, config, date, cli.json)?;
        }
        Commands::GenerateSeed {
            approved,
            seed_path,
            output,
            version,
            effective_from,
            config,
        } => {
            generate_seed(approved, seed_path, output, version, effective_from, config, cli.json)?;
        }
        Commands::Explain { input, sku, config } => {
            explain(input, sku, config, cli.json)?;
        }
        Commands::InitConfig { path, force } => {
            CurationConfig::init(&path, force)?;
            info!("Wrote default config to {}", path.display());
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

fn resolve_input(input: Option<PathBuf>, config: &CurationConfig) -> Result<PathBuf> {
    input
        .or_else(|| config.input.path.clone())
        .context("No candidate table given; pass --input or set input.path in the config")
}

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => Ok(parse_date(d)?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn export(
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
    date: Option<String>,
    json_output: bool,
) -> Result<()> {
    let config = CurationConfig::load_or_default(config_path.as_deref())?;
    let input = resolve_input(input, &config)?;
    let output_dir = output_dir.unwrap_or_else(|| config.output.export_dir.clone());
    let output = output_dir.join(export_file_name(resolve_date(date.as_deref())?));

    info!("Starting curation export");
    info!("  Input: {:?}", input);
    info!("  Output: {:?}", output);
    info!("  Params: {:?}", config.curation);

    let groups = load_alias_groups(&input, &config.alias_columns())
        .with_context(|| format!("Failed to load alias groups from {}", input.display()))?;

    let pipeline = Pipeline::new(config.pipeline_config())?;

    let progress = ProgressReporter::new(groups.len() as u64, json_output);
    let (records, stats) = pipeline.curate_all_with_progress(&groups, |done| progress.update(done));
    progress.finish();

    write_curation_export(&output, &records)
        .with_context(|| format!("Failed to write curation export {}", output.display()))?;

    if json_output {
        let report = serde_json::json!({
            "input": input.to_string_lossy().to_string(),
            "output": output.to_string_lossy().to_string(),
            "total_aliases": stats.total_aliases,
            "total_groups": stats.total_groups,
            "auto": stats.auto,
            "need_approval": stats.need_approval,
            "auto_rate": stats.auto_rate(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        progress::print_export_report(&input, &output, &stats);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn generate_seed(
    approved: PathBuf,
    seed_path: Option<PathBuf>,
    output: Option<PathBuf>,
    version: Option<String>,
    effective_from: Option<String>,
    config_path: Option<PathBuf>,
    json_output: bool,
) -> Result<()> {
    let config = CurationConfig::load_or_default(config_path.as_deref())?;
    let seed_path = seed_path.unwrap_or_else(|| config.seed.path.clone());
    let output = output.unwrap_or_else(|| seed_path.clone());

    if let Some(v) = version.as_deref() {
        if SeedVersion::parse(v).is_none() {
            warn!("Version {:?} is not vMAJOR.MINOR; later bumps will treat it as v0.0", v);
        }
    }
    let effective_from = effective_from.as_deref().map(parse_date).transpose()?;

    info!("Generating seed");
    info!("  Approved: {:?}", approved);
    info!("  Seed: {:?}", seed_path);

    let existing = read_seed(&seed_path)
        .with_context(|| format!("Failed to read seed {}", seed_path.display()))?;
    let overrides = read_overrides(&approved)
        .with_context(|| format!("Failed to read reviewed export {}", approved.display()))?;

    let outcome = SeedMerger::new(version, effective_from)
        .merge(existing, &overrides)
        .context("Seed merge rejected")?;

    write_seed(&output, &outcome.rows)
        .with_context(|| format!("Failed to write seed {}", output.display()))?;

    if json_output {
        let report = serde_json::json!({
            "approved": approved.to_string_lossy().to_string(),
            "seed": output.to_string_lossy().to_string(),
            "rows": outcome.rows.len(),
            "version": outcome.version,
            "effective_from": outcome.effective_from,
            "inserted": outcome.stats.inserted,
            "replaced": outcome.stats.replaced,
            "kept": outcome.stats.kept,
            "skipped_need_approval": outcome.stats.skipped_need_approval,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        progress::print_seed_report(&output, outcome.rows.len(), &outcome.version, &outcome.stats);
    }

    Ok(())
}

fn explain(
    input: Option<PathBuf>,
    sku: String,
    config_path: Option<PathBuf>,
    json_output: bool,
) -> Result<()> {
    let config = CurationConfig::load_or_default(config_path.as_deref())?;
    let input = resolve_input(input, &config)?;

    let groups = load_alias_groups(&input, &config.alias_columns())
        .with_context(|| format!("Failed to load alias groups from {}", input.display()))?;
    let group = groups
        .iter()
        .find(|g| g.sku_id() == sku)
        .with_context(|| format!("SKU {} not found in {}", sku, input.display()))?;

    let engine = CurationDecisionEngine::new(config.curation)?;
    let detail = engine.curate_detailed(group);

    if json_output {
        let report = serde_json::json!({
            "sku_id": group.sku_id(),
            "aliases": group.aliases(),
            "rep_map": detail.rep_map.sorted_entries(),
            "transformed_aliases": detail.transformed_aliases,
            "canonical_tokens": detail.canonical_tokens,
            "ranked": detail.ranked,
            "record": detail.record,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_explanation(group.sku_id(), &detail);
    Ok(())
}

fn print_explanation(sku_id: &str, detail: &CurationDetail) {
    println!("\n{}", "═".repeat(60));
    println!("SKU {}", sku_id);
    println!("{}", "═".repeat(60));

    println!("Typo collapse:");
    let collapsed: Vec<(&str, &str)> = detail
        .rep_map
        .sorted_entries()
        .into_iter()
        .filter(|(token, rep)| token != rep)
        .collect();
    if collapsed.is_empty() {
        println!("  (none)");
    }
    for (token, rep) in collapsed {
        println!("  {} -> {}", token, rep);
    }

    println!("Transformed aliases:");
    for alias in &detail.transformed_aliases {
        println!("  {}", alias);
    }

    println!("Canonical tokens:   {}", detail.canonical_tokens.join(" "));

    println!("Ranked aliases:");
    for (i, ranked) in detail.ranked.iter().enumerate() {
        println!(
            "  {}. {:>3}  x{}  {}  ->  {}",
            i + 1,
            ranked.score,
            ranked.frequency,
            ranked.alias,
            ranked.canonicalized
        );
    }

    let record = &detail.record;
    println!("Decision:           {}", record.decision);
    println!("Match:              {} ({})", record.match_name, record.match_score);
    if !record.final_sku_name.is_empty() {
        println!("Final name:         {}", record.final_sku_name);
    }
    println!("{}", "═".repeat(60));
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
