//! Heron CLI - build dataset catalogs and validate query plans
//!
//! Usage:
//!   heron catalog <summary.json> --dataset-id <id>
//!   heron validate <query.json> --catalog <catalog.json>
//!   heron validate <query.json> --summary <summary.json> [--dataset-id <id>]
//!   heron limits
//!
//! Examples:
//!   heron catalog profiles/sales.json --dataset-id sales_2024 > sales.catalog.json
//!   heron validate plan.json --catalog sales.catalog.json
//!   RUST_LOG=heron=debug heron validate plan.json --summary profiles/sales.json

use clap::{Args, Parser, Subcommand};
use heron::catalog::{DatasetCatalog, RawStatisticalSummary};
use heron::config::Settings;
use heron::dsl::QueryDsl;
use heron::error::{read_json, HeronError, HeronResult};
use heron::validation::validate_with_limits;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit code for unreadable or malformed input, distinct from "invalid plan".
const EXIT_INPUT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "heron")]
#[command(about = "Heron - catalog-aware validation for analytical query plans")]
#[command(version)]
struct Cli {
    /// Path to a heron.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a dataset catalog from a profiling summary
    Catalog {
        /// Path to the statistical summary JSON
        summary: PathBuf,

        /// Identifier of the dataset the summary describes
        #[arg(short, long)]
        dataset_id: String,
    },

    /// Validate a query plan against a dataset catalog
    Validate {
        /// Path to the query DSL JSON
        query: PathBuf,

        #[command(flatten)]
        source: CatalogSource,

        /// Dataset the summary describes; defaults to the query's dataset_id,
        /// which skips the dataset identity check
        #[arg(short, long, requires = "summary")]
        dataset_id: Option<String>,
    },

    /// Print the effective query limits
    Limits,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct CatalogSource {
    /// Path to a catalog JSON produced by `heron catalog`
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Path to a statistical summary; the catalog is built on the fly
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(EXIT_INPUT_ERROR);
        }
    };

    init_logging(&settings);

    let outcome = match cli.command {
        Commands::Catalog {
            summary,
            dataset_id,
        } => cmd_catalog(&settings, &summary, &dataset_id),
        Commands::Validate {
            query,
            source,
            dataset_id,
        } => cmd_validate(&settings, &query, source, dataset_id.as_deref()),
        Commands::Limits => print_json(&settings.limits).map(|_| ExitCode::SUCCESS),
    };

    outcome.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INPUT_ERROR)
    })
}

fn load_settings(path: Option<&Path>) -> HeronResult<Settings> {
    let settings = match path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };
    Ok(settings)
}

/// Logs go to stderr; stdout carries JSON only.
fn init_logging(settings: &Settings) {
    let fallback = settings
        .logging
        .resolved_filter()
        .unwrap_or_else(|_| "heron=info".to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_catalog(settings: &Settings, summary: &Path, dataset_id: &str) -> HeronResult<ExitCode> {
    let summary: RawStatisticalSummary = read_json(summary, "statistical summary")?;
    let catalog = settings.catalog.builder().build(dataset_id, &summary);

    info!(
        dataset_id,
        columns = catalog.columns.len(),
        "catalog built"
    );
    print_json(&catalog)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(
    settings: &Settings,
    query: &Path,
    source: CatalogSource,
    dataset_id: Option<&str>,
) -> HeronResult<ExitCode> {
    let dsl: QueryDsl = read_json(query, "query DSL")?;

    // clap's arg group guarantees exactly one source
    let catalog: DatasetCatalog = match source.catalog {
        Some(path) => read_json(path, "dataset catalog")?,
        None => {
            let path = source.summary.unwrap_or_default();
            let summary: RawStatisticalSummary = read_json(path, "statistical summary")?;
            let dataset_id = dataset_id.unwrap_or(dsl.dataset_id.as_str());
            settings.catalog.builder().build(dataset_id, &summary)
        }
    };

    debug!(
        dataset_id = %catalog.dataset_id,
        columns = catalog.columns.len(),
        "catalog loaded"
    );

    let result = validate_with_limits(&dsl, &catalog, &settings.limits);
    print_json(&result)?;

    if result.valid {
        info!(dataset_id = %dsl.dataset_id, "query plan is valid");
        Ok(ExitCode::SUCCESS)
    } else {
        info!(
            dataset_id = %dsl.dataset_id,
            errors = result.errors.len(),
            "query plan rejected"
        );
        Ok(ExitCode::FAILURE)
    }
}

fn print_json<T: Serialize>(value: &T) -> HeronResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| HeronError::Json {
        what: "output",
        source: e,
    })?;
    println!("{}", json);
    Ok(())
}
