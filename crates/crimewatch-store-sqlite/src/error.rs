//! Error type for `crimewatch-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A district row vanished between insert-if-absent and the read-back.
  #[error("district {0:?} missing after seeding")]
  DistrictMissing(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
