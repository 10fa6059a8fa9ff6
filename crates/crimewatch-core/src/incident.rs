//! Incident records — validated crime reports attached to a district.
//!
//! Incidents are append-only: the ingestion pipeline inserts them and
//! nothing in this workspace updates or deletes them. The source URL is the
//! sole uniqueness key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::district::District;

// ─── Incident ────────────────────────────────────────────────────────────────

/// A persisted incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
  pub incident_id:   Uuid,
  pub district_id:   Uuid,
  pub title:         String,
  pub description:   String,
  /// Globally unique across the store.
  pub source_url:    String,
  /// When the incident happened, as reported upstream (or the processing
  /// time when the upstream date could not be parsed).
  pub incident_date: DateTime<Utc>,
  pub category:      String,
  /// Server-assigned insertion timestamp.
  pub created_at:    DateTime<Utc>,
}

// ─── NewIncident ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::IncidentStore::insert_incident`].
/// `incident_id` and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
  pub district_id:   Uuid,
  pub title:         String,
  pub description:   String,
  pub source_url:    String,
  pub incident_date: DateTime<Utc>,
  pub category:      String,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// An incident joined with its district, as served by the read API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentView {
  #[serde(flatten)]
  pub incident: Incident,
  pub district: District,
}

/// Per-district incident count. Districts without incidents report zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictStat {
  pub district_name: String,
  pub latitude:      f64,
  pub longitude:     f64,
  pub count:         u64,
}
