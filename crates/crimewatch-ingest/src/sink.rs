//! Persistence of districts and incidents.

use crimewatch_core::{
  district::ReferenceDistrict,
  incident::{Incident, NewIncident},
  store::{IncidentStore, InsertOutcome, SeedOutcome},
};
use tracing::{debug, info, warn};

/// Counts from [`Sink::seed_districts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub inserted: usize,
  pub existing: usize,
  pub failed:   usize,
}

/// Result of [`Sink::save_record`]. None of these stop a run.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
  Saved(Incident),
  /// Another writer stored the same source URL after the dedup check.
  Conflict,
  /// The store reported an error; it has been logged.
  Failed,
}

pub struct Sink<'a, S> {
  store: &'a S,
}

impl<'a, S: IncidentStore> Sink<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Insert every reference district that is not stored yet. Existing rows
  /// are left untouched. Per-district failures are logged and counted.
  pub async fn seed_districts(&self, reference: &[ReferenceDistrict]) -> SeedReport {
    info!(count = reference.len(), "seeding districts");

    let mut report = SeedReport::default();
    for district in reference {
      match self.store.ensure_district(district).await {
        Ok(SeedOutcome::Inserted(_)) => report.inserted += 1,
        Ok(SeedOutcome::Existing(_)) => {
          debug!(name = district.name, "district already exists, leaving it unchanged");
          report.existing += 1;
        }
        Err(e) => {
          warn!(name = district.name, error = %e, "failed to seed district");
          report.failed += 1;
        }
      }
    }

    info!(
      inserted = report.inserted,
      existing = report.existing,
      failed = report.failed,
      "district seeding completed"
    );
    report
  }

  /// Insert one incident.
  pub async fn save_record(&self, input: NewIncident) -> SaveOutcome {
    let source_url = input.source_url.clone();
    match self.store.insert_incident(input).await {
      Ok(InsertOutcome::Inserted(incident)) => {
        info!(title = %incident.title, source_url = %incident.source_url, "saved incident");
        SaveOutcome::Saved(incident)
      }
      Ok(InsertOutcome::Conflict) => {
        warn!(%source_url, "source URL stored concurrently, skipping");
        SaveOutcome::Conflict
      }
      Err(e) => {
        warn!(%source_url, error = %e, "failed to save incident");
        SaveOutcome::Failed
      }
    }
  }
}
