//! crimewatch API server binary.
//!
//! Reads `crimewatch.toml` (or the path specified with `--config`), opens the
//! SQLite store populated by `ingest`, and serves the read API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use crimewatch_api::ServerConfig;
use crimewatch_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "crimewatch read API server")]
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

  // `PORT` is honoured for platforms that inject it.
  let server_cfg =
    ServerConfig::load(&cli.config).context("failed to load ServerConfig")?;

  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  let app = crimewatch_api::api_router(Arc::new(store));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
