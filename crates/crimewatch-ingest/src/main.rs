//! `ingest` — run one crime-incident ingestion pass.
//!
//! Reads `crimewatch.toml` (or the path given with `--config`), opens the
//! SQLite store, and processes one randomly selected set of districts.
//! Partial failure (failed batches, skipped records) still exits with
//! status 0; only configuration or storage failures are fatal. A missing API
//! key is not: districts are still seeded and every batch is reported failed.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use crimewatch_core::district::REFERENCE_DISTRICTS;
use crimewatch_ingest::{IngestConfig, Orchestrator, gemini::GeminiClient};
use crimewatch_store_sqlite::SqliteStore;
use rand::{SeedableRng, rngs::StdRng};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Crimewatch ingestion job")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "crimewatch.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = IngestConfig::load(&cli.config).context("failed to load configuration")?;

  tracing::info!("starting ingestion job");

  let store_path = cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let generator = GeminiClient::from_config(&cfg.generator);
  tracing::info!(model = generator.model(), "generator ready");

  let report = Orchestrator::new(&store, &generator, REFERENCE_DISTRICTS, cfg.schedule)
    .with_grounding(cfg.generator.grounding)
    .run(&mut StdRng::from_entropy())
    .await;

  tracing::info!(
    selected = report.selected.len(),
    batches = report.batches.len(),
    failed_batches = report.failed_batches(),
    saved = report.saved(),
    "ingestion job completed"
  );

  Ok(())
}
