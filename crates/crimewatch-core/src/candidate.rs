//! Candidate records — unvalidated incident data recovered from upstream
//! text.
//!
//! Upstream output is not guaranteed to be well-formed, so every field is
//! optional and accepted leniently: strings are kept as-is, numbers and
//! booleans are rendered to text, `null` and missing keys become `None`.
//! Sentinel values such as `"NaN"` are *not* interpreted here; that mapping
//! belongs to the validator.

use serde::{Deserialize, Deserializer, Serialize};

use crate::Result;

/// One element of the JSON array returned by the upstream generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
  #[serde(default, deserialize_with = "lenient_text")]
  pub district_name: Option<String>,
  #[serde(default, deserialize_with = "lenient_text")]
  pub article_title: Option<String>,
  #[serde(default, deserialize_with = "lenient_text")]
  pub description:   Option<String>,
  #[serde(default, deserialize_with = "lenient_text")]
  pub incident_date: Option<String>,
  #[serde(default, deserialize_with = "lenient_text")]
  pub source_url:    Option<String>,
  #[serde(default, deserialize_with = "lenient_text")]
  pub category:      Option<String>,
}

impl CandidateRecord {
  /// Deserialise a JSON array of candidate objects.
  ///
  /// Fails if the payload is not an array, or if any element is not an
  /// object.
  pub fn from_json_array(payload: &str) -> Result<Vec<Self>> {
    Ok(serde_json::from_str(payload)?)
  }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  use serde_json::Value;

  Ok(match Value::deserialize(deserializer)? {
    Value::Null => None,
    Value::String(s) => Some(s),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    other => Some(other.to_string()),
  })
}
