//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings so that
//! lexicographic order matches chronological order. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use crimewatch_core::{
  district::District,
  incident::{DistrictStat, Incident, IncidentView},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `districts` row.
pub struct RawDistrict {
  pub district_id: String,
  pub name:        String,
  pub latitude:    f64,
  pub longitude:   f64,
}

impl RawDistrict {
  pub const COLUMNS: &'static str = "district_id, name, latitude, longitude";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      district_id: row.get(0)?,
      name:        row.get(1)?,
      latitude:    row.get(2)?,
      longitude:   row.get(3)?,
    })
  }

  pub fn into_district(self) -> Result<District> {
    Ok(District {
      district_id: decode_uuid(&self.district_id)?,
      name:        self.name,
      latitude:    self.latitude,
      longitude:   self.longitude,
    })
  }
}

/// Raw values read from an `incidents` row joined with its district.
pub struct RawIncidentView {
  // incidents columns
  pub incident_id:   String,
  pub district_id:   String,
  pub title:         String,
  pub description:   String,
  pub source_url:    String,
  pub incident_date: String,
  pub category:      String,
  pub created_at:    String,
  // districts join
  pub district_name: String,
  pub latitude:      f64,
  pub longitude:     f64,
}

impl RawIncidentView {
  pub fn into_view(self) -> Result<IncidentView> {
    let district_id = decode_uuid(&self.district_id)?;

    let incident = Incident {
      incident_id: decode_uuid(&self.incident_id)?,
      district_id,
      title: self.title,
      description: self.description,
      source_url: self.source_url,
      incident_date: decode_dt(&self.incident_date)?,
      category: self.category,
      created_at: decode_dt(&self.created_at)?,
    };

    let district = District {
      district_id,
      name:      self.district_name,
      latitude:  self.latitude,
      longitude: self.longitude,
    };

    Ok(IncidentView { incident, district })
  }
}

/// Raw values from the per-district aggregate query.
pub struct RawDistrictStat {
  pub district_name: String,
  pub latitude:      f64,
  pub longitude:     f64,
  pub count:         i64,
}

impl RawDistrictStat {
  pub fn into_stat(self) -> DistrictStat {
    DistrictStat {
      district_name: self.district_name,
      latitude:      self.latitude,
      longitude:     self.longitude,
      count:         u64::try_from(self.count).unwrap_or_default(),
    }
  }
}
