//! Instruction text sent to the upstream generator.

use crate::{generator::GenerationRequest, validate::SENTINEL};

/// News outlets the generator is asked to restrict itself to.
pub const ALLOWED_SOURCES: &[&str] = &[
  "news.detik.com",
  "kompas.com",
  "tribunnews.com",
  "cnnindonesia.com",
  "liputan6.com",
];

pub const SYSTEM_INSTRUCTION: &str = "You are a strict JSON data extractor. \
  You only output valid JSON arrays. You never output markdown or prose \
  outside the JSON.";

/// Build the request for one batch of districts.
pub fn batch_request(targets: &[&str], grounding: bool) -> GenerationRequest {
  GenerationRequest {
    system: SYSTEM_INSTRUCTION.to_owned(),
    instruction: instruction(targets),
    targets: targets.iter().map(|t| (*t).to_owned()).collect(),
    grounding,
  }
}

fn instruction(targets: &[&str]) -> String {
  let target_list = targets.join(", ");
  let sources = ALLOWED_SOURCES.join(", ");

  format!(
    r#"You are a crime data extractor with access to web search.

Task: find criminal news from the last 12 months for exactly these districts of Bandung:
[{target_list}]

Requirements:
1. Search for at least 2 distinct cases for EACH district listed above.
2. Allowed sources: {sources}.
3. Every "source_url" must be a link returned by the search tool, unmodified.
4. If a district has no recent news, return one object with "district_name" set and every other field set to "{SENTINEL}".
5. Do not invent data. If no link can be found, report "{SENTINEL}".
6. "incident_date" must be an RFC 3339 timestamp, e.g. 2024-05-01T10:00:00+07:00.

Output schema (a JSON array and nothing else):
[
  {{
    "district_name": "String",
    "article_title": "String",
    "description": "String (summary)",
    "incident_date": "RFC 3339 String",
    "source_url": "String (exact URL from search)",
    "category": "String"
  }}
]
"#
  )
}
