//! The `IncidentStore` trait and its outcome types.
//!
//! The trait is implemented by storage backends (e.g.
//! `crimewatch-store-sqlite`). The ingestion pipeline and the read API depend
//! on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  district::{District, ReferenceDistrict},
  incident::{DistrictStat, Incident, IncidentView, NewIncident},
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of [`IncidentStore::ensure_district`].
#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
  /// No row with that name existed; one was created.
  Inserted(District),
  /// A row with that name already existed and was left untouched.
  Existing(District),
}

impl SeedOutcome {
  pub fn district(&self) -> &District {
    match self {
      Self::Inserted(d) | Self::Existing(d) => d,
    }
  }
}

/// Result of [`IncidentStore::insert_incident`].
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
  Inserted(Incident),
  /// The store's unique constraint on `source_url` rejected the row.
  Conflict,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a crimewatch storage backend.
///
/// Districts are insert-if-absent and never updated. Incidents are
/// append-only.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait IncidentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Districts ─────────────────────────────────────────────────────────

  /// Insert `district` unless a row with exactly the same name exists.
  /// An existing row's coordinates are never changed.
  fn ensure_district<'a>(
    &'a self,
    district: &'a ReferenceDistrict,
  ) -> impl Future<Output = Result<SeedOutcome, Self::Error>> + Send + 'a;

  /// Look up a district by case-insensitive exact name.
  fn find_district<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<District>, Self::Error>> + Send + 'a;

  /// List all districts, ordered by name.
  fn list_districts(
    &self,
  ) -> impl Future<Output = Result<Vec<District>, Self::Error>> + Send + '_;

  // ── Incidents ─────────────────────────────────────────────────────────

  /// Whether an incident with exactly this source URL is already stored.
  fn incident_exists<'a>(
    &'a self,
    source_url: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Insert a new incident. `incident_id` and `created_at` are set by the
  /// store. A unique-constraint violation on the source URL is reported as
  /// [`InsertOutcome::Conflict`] rather than as an error.
  fn insert_incident(
    &self,
    input: NewIncident,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All incidents with their district, newest incident date first.
  fn list_incidents(
    &self,
  ) -> impl Future<Output = Result<Vec<IncidentView>, Self::Error>> + Send + '_;

  /// Incident count for every district, including districts with none.
  fn district_stats(
    &self,
  ) -> impl Future<Output = Result<Vec<DistrictStat>, Self::Error>> + Send + '_;
}
