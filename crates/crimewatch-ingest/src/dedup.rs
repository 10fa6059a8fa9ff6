//! Source-URL deduplication.
//!
//! The check is point-in-time and not transactional with the insert that
//! follows it. Two overlapping runs can both pass the gate for the same URL;
//! the store's unique constraint on `source_url` then rejects the second
//! insert, which the sink reports as a conflict.

use crimewatch_core::store::IncidentStore;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
  Admit,
  Duplicate,
}

pub struct DedupGate<'a, S> {
  store: &'a S,
}

impl<'a, S: IncidentStore> DedupGate<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Admit `source_url` unless an incident with exactly that URL is stored.
  pub async fn admit(&self, source_url: &str) -> Result<Admission, S::Error> {
    if self.store.incident_exists(source_url).await? {
      info!(source_url, "duplicate found, skipping");
      Ok(Admission::Duplicate)
    } else {
      Ok(Admission::Admit)
    }
  }
}
