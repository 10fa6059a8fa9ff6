//! Validation and normalisation of candidate records.
//!
//! Upstream marks "no data" with the literal sentinel [`SENTINEL`]. This is
//! the one place where that text is mapped to absence: after [`validate`],
//! fields are either real values or gone.
//!
//! A candidate is rejected when the district name, title or source URL is
//! absent, or when the description is the sentinel. An unparseable incident
//! date is *not* a rejection; the processing time is used instead.
//!
//! District names are matched against the seeded reference set only
//! ([`Normalizer`]); unknown names are discarded, never created.

use chrono::{DateTime, Utc};
use crimewatch_core::{
  candidate::CandidateRecord,
  incident::NewIncident,
  store::IncidentStore,
};
use thiserror::Error;

/// Literal upstream marker for "no data available".
pub const SENTINEL: &str = "NaN";

/// Map a raw field to `None` when it is missing, blank or the sentinel.
pub fn present(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty() && *v != SENTINEL)
}

/// Why a candidate was dropped before reaching storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
  #[error("required field `{0}` is missing")]
  Missing(&'static str),

  #[error("description is the no-data sentinel")]
  SentinelDescription,
}

/// A candidate whose fields passed validation, with the date normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCandidate {
  pub district_name: String,
  pub title:         String,
  pub description:   String,
  pub source_url:    String,
  pub incident_date: DateTime<Utc>,
  /// `true` when the upstream date was unusable and `incident_date` is the
  /// processing time.
  pub date_fallback: bool,
  pub category:      String,
}

/// Strict RFC 3339 parse of an upstream date.
pub fn parse_incident_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
  let raw = present(raw)?;
  DateTime::parse_from_rfc3339(raw)
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}

/// Check required fields and normalise the date. `now` is the processing
/// time used when the date cannot be parsed.
pub fn validate(
  candidate: &CandidateRecord,
  now: DateTime<Utc>,
) -> Result<ValidCandidate, Rejection> {
  let district_name = present(candidate.district_name.as_deref())
    .ok_or(Rejection::Missing("district_name"))?;
  let title = present(candidate.article_title.as_deref())
    .ok_or(Rejection::Missing("article_title"))?;
  let source_url = present(candidate.source_url.as_deref())
    .ok_or(Rejection::Missing("source_url"))?;

  let description = candidate.description.as_deref().map(str::trim).unwrap_or_default();
  if description == SENTINEL {
    return Err(Rejection::SentinelDescription);
  }

  let parsed_date = parse_incident_date(candidate.incident_date.as_deref());

  Ok(ValidCandidate {
    district_name: district_name.to_owned(),
    title:         title.to_owned(),
    description:   description.to_owned(),
    source_url:    source_url.to_owned(),
    incident_date: parsed_date.unwrap_or(now),
    date_fallback: parsed_date.is_none(),
    category:      present(candidate.category.as_deref()).unwrap_or_default().to_owned(),
  })
}

// ─── District resolution ─────────────────────────────────────────────────────

/// Result of [`Normalizer::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
  /// The district matched; the record is ready for the dedup gate.
  Matched(NewIncident),
  /// No seeded district has this name.
  Unmatched(String),
}

/// Maps validated candidates onto seeded districts.
pub struct Normalizer<'a, S> {
  store: &'a S,
}

impl<'a, S: IncidentStore> Normalizer<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Resolve the candidate's district by case-insensitive exact name.
  pub async fn resolve(
    &self,
    valid: ValidCandidate,
  ) -> Result<Resolution, S::Error> {
    let Some(district) = self.store.find_district(&valid.district_name).await? else {
      return Ok(Resolution::Unmatched(valid.district_name));
    };

    Ok(Resolution::Matched(NewIncident {
      district_id:   district.district_id,
      title:         valid.title,
      description:   valid.description,
      source_url:    valid.source_url,
      incident_date: valid.incident_date,
      category:      valid.category,
    }))
  }
}
