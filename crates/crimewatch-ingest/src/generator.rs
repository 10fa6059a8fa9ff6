//! The upstream generator interface.
//!
//! A generator takes an instruction naming a handful of target districts and
//! returns free text that is *expected* to contain a JSON array of incident
//! objects. Nothing about the shape of that text is guaranteed; recovering
//! the payload is the parser's job.

use std::future::Future;

use thiserror::Error;

/// One upstream exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
  /// Standing instruction sent as the system turn.
  pub system:      String,
  /// The per-batch user instruction.
  pub instruction: String,
  /// District names this request asks about.
  pub targets:     Vec<String>,
  /// Whether the generator may ground its answer with web search.
  pub grounding:   bool,
}

#[derive(Debug, Error)]
pub enum GeneratorError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("upstream returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("could not decode upstream response: {0}")]
  Decode(String),

  #[error("upstream returned no content")]
  Empty,

  #[error("invalid generator configuration: {0}")]
  Config(String),
}

/// Abstraction over an upstream text generator.
///
/// Each call is a single blocking round trip; implementations do not retry.
pub trait Generator: Send + Sync {
  fn generate<'a>(
    &'a self,
    request: &'a GenerationRequest,
  ) -> impl Future<Output = Result<String, GeneratorError>> + Send + 'a;
}
