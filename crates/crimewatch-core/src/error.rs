//! Error types for `crimewatch-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("candidate payload is not a JSON array of objects: {0}")]
  CandidatePayload(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
