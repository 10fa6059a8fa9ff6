//! Read-only JSON API over the crimewatch store.
//!
//! Exposes an axum [`Router`] backed by any
//! [`crimewatch_core::store::IncidentStore`]. Both endpoints are pure reads
//! and can run alongside an ingestion job without coordination.

pub mod error;
pub mod handlers;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Router, routing::get};
use crimewatch_core::store::IncidentStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `crimewatch.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("crimewatch.db") }

/// `CRIMEWATCH_*` variables, with `__` separating nested keys. Same
/// convention as the ingestion job.
pub fn environment() -> config::Environment {
  config::Environment::with_prefix("CRIMEWATCH")
    .prefix_separator("_")
    .separator("__")
    .try_parsing(true)
}

impl ServerConfig {
  /// Load from `path` (if it exists), then `CRIMEWATCH_*`, then `PORT`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::from_sources(path, environment(), std::env::var("PORT").ok())
  }

  fn from_sources(
    path: &Path,
    env: config::Environment,
    port: Option<String>,
  ) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(env)
      .set_override_option("port", port)?
      .build()?
      .try_deserialize()
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `store`, with permissive CORS and request
/// tracing.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: IncidentStore + 'static,
{
  Router::new()
    .route("/", get(handlers::banner))
    .route("/incidents", get(handlers::incidents::<S>))
    .route("/stats/district", get(handlers::district_stats::<S>))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}
