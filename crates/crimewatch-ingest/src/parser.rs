//! Best-effort recovery of a candidate array from upstream text.
//!
//! Upstream answers are supposed to be a bare JSON array but routinely
//! arrive wrapped in prose or markdown fences. Recovery is two steps:
//!
//! 1. strip code-fence markers from the start and end of the text;
//! 2. take the span from the first `[` to the last `]`, inclusive, and
//!    deserialise it.
//!
//! The outcome is an [`Extraction`]; none of its variants is fatal to a run.

use crimewatch_core::candidate::CandidateRecord;

/// The result of [`extract`].
#[derive(Debug)]
pub enum Extraction {
  /// A bracketed payload was found and deserialised.
  Found(Vec<CandidateRecord>),
  /// The text has no `[ ... ]` span.
  NotFound,
  /// A bracketed span was found but is not a valid candidate array.
  Malformed(crimewatch_core::Error),
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` marker and a trailing
/// ```` ``` ```` marker, plus surrounding whitespace.
pub fn strip_code_fences(text: &str) -> &str {
  let trimmed = text.trim();
  let without_open = trimmed
    .strip_prefix("```json")
    .or_else(|| trimmed.strip_prefix("```JSON"))
    .or_else(|| trimmed.strip_prefix("```"))
    .unwrap_or(trimmed);
  without_open
    .trim_end()
    .strip_suffix("```")
    .unwrap_or(without_open)
    .trim()
}

/// The span from the first `[` to the last `]`, inclusive.
pub fn locate_payload(text: &str) -> Option<&str> {
  let start = text.find('[')?;
  let end = text.rfind(']')?;
  (start < end).then(|| &text[start..=end])
}

/// Recover the candidate records contained in `text`.
pub fn extract(text: &str) -> Extraction {
  let Some(payload) = locate_payload(strip_code_fences(text)) else {
    return Extraction::NotFound;
  };

  match CandidateRecord::from_json_array(payload) {
    Ok(records) => Extraction::Found(records),
    Err(e) => Extraction::Malformed(e),
  }
}
