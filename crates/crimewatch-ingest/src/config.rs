//! Runtime configuration for the ingestion job.
//!
//! Values are layered, lowest priority first:
//!
//! 1. built-in defaults (and `GOOGLE_API_KEY` for the generator key),
//! 2. the TOML file passed with `--config` (optional),
//! 3. `CRIMEWATCH_*` environment variables, with `__` separating nested keys
//!    (e.g. `CRIMEWATCH_SCHEDULE__BATCH_SIZE=5`).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

// ─── Batch policy ─────────────────────────────────────────────────────────────

/// How a run spreads its upstream requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchPolicy {
  /// Districts picked per run; clamped to the number available.
  pub subset_size: usize,
  /// Districts per upstream request.
  pub batch_size:  usize,
  /// Delay between consecutive requests, in milliseconds.
  pub pacing_ms:   u64,
}

impl Default for BatchPolicy {
  fn default() -> Self {
    Self { subset_size: 15, batch_size: 3, pacing_ms: 2_000 }
  }
}

impl BatchPolicy {
  pub fn pacing(&self) -> Duration { Duration::from_millis(self.pacing_ms) }
}

// ─── Generator ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
  #[serde(default)]
  pub api_key:   String,
  #[serde(default = "default_model")]
  pub model:     String,
  #[serde(default = "default_base_url")]
  pub base_url:  String,
  /// Let the generator ground its answer with web search.
  #[serde(default = "default_true")]
  pub grounding: bool,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self {
      api_key:   String::new(),
      model:     default_model(),
      base_url:  default_base_url(),
      grounding: true,
    }
  }
}

fn default_model() -> String { DEFAULT_MODEL.to_owned() }

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }

fn default_true() -> bool { true }

// ─── Top level ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub schedule:   BatchPolicy,
  #[serde(default)]
  pub generator:  GeneratorConfig,
}

fn default_store_path() -> PathBuf { PathBuf::from("crimewatch.db") }

impl IngestConfig {
  /// Load configuration from `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    let google_key = std::env::var("GOOGLE_API_KEY").unwrap_or_default();

    config::Config::builder()
      .set_default("generator.api_key", google_key)?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(
        config::Environment::with_prefix("CRIMEWATCH")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  /// The store path with a leading `~` expanded to the home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_policy_matches_documented_schedule() {
    let policy = BatchPolicy::default();
    assert_eq!(policy.subset_size, 15);
    assert_eq!(policy.batch_size, 3);
    assert_eq!(policy.pacing(), Duration::from_secs(2));
  }

  #[test]
  fn partial_toml_keeps_defaults() {
    let cfg: IngestConfig = config::Config::builder()
      .add_source(config::File::from_str(
        "store_path = \"/tmp/x.db\"\n[schedule]\nbatch_size = 5\n",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.store_path, PathBuf::from("/tmp/x.db"));
    assert_eq!(cfg.schedule.batch_size, 5);
    assert_eq!(cfg.schedule.subset_size, 15);
    assert_eq!(cfg.generator.model, DEFAULT_MODEL);
    assert!(cfg.generator.grounding);
  }

  #[test]
  fn expand_tilde_leaves_plain_paths_alone() {
    assert_eq!(expand_tilde(Path::new("data/x.db")), PathBuf::from("data/x.db"));
  }
}
