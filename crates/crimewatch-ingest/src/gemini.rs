//! [`GeminiClient`] — a [`Generator`] backed by the Gemini
//! `generateContent` REST endpoint.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
  config::GeneratorConfig,
  generator::{GenerationRequest, Generator, GeneratorError},
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
  contents:           Vec<Content<'a>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  system_instruction: Option<Content<'a>>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  tools:              Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  role:  Option<&'static str>,
  parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
  text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
  google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

impl<'a> GenerateContentRequest<'a> {
  fn from_request(request: &'a GenerationRequest) -> Self {
    let system_instruction = (!request.system.is_empty()).then(|| Content {
      role:  None,
      parts: vec![Part { text: &request.system }],
    });

    let tools = if request.grounding {
      vec![Tool { google_search: GoogleSearch {} }]
    } else {
      Vec::new()
    };

    Self {
      contents: vec![Content {
        role:  Some("user"),
        parts: vec![Part { text: &request.instruction }],
      }],
      system_instruction,
      tools,
    }
  }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
  text: Option<String>,
}

impl GenerateContentResponse {
  /// Concatenated text parts of the first candidate, if there is any text.
  fn text(&self) -> Option<String> {
    let parts = &self.candidates.first()?.content.as_ref()?.parts;
    let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
    (!text.is_empty()).then_some(text)
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Gemini API client.
///
/// No request timeout is configured; a stalled exchange stalls the run.
#[derive(Clone)]
pub struct GeminiClient {
  http:     reqwest::Client,
  api_key:  String,
  model:    String,
  base_url: String,
}

impl GeminiClient {
  pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
    Self {
      http:     reqwest::Client::new(),
      api_key:  api_key.into(),
      model:    model.into(),
      base_url: DEFAULT_BASE_URL.to_owned(),
    }
  }

  pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
    self.base_url = url.into();
    self
  }

  /// Build a client from configuration. A missing key is logged here and
  /// then reported by every [`Generator::generate`] call, so a run still
  /// seeds districts and records each batch as failed.
  pub fn from_config(cfg: &GeneratorConfig) -> Self {
    let client = Self::new(cfg.api_key.trim(), &cfg.model).with_base_url(&cfg.base_url);
    if !client.has_api_key() {
      error!("no API key configured (set generator.api_key or GOOGLE_API_KEY)");
    }
    client
  }

  pub fn has_api_key(&self) -> bool { !self.api_key.is_empty() }

  pub fn model(&self) -> &str { &self.model }

  fn url(&self) -> String {
    format!(
      "{}/v1beta/models/{}:generateContent",
      self.base_url.trim_end_matches('/'),
      self.model
    )
  }

  fn headers(&self) -> Result<HeaderMap, GeneratorError> {
    let mut headers = HeaderMap::new();
    headers.insert(
      "x-goog-api-key",
      HeaderValue::from_str(&self.api_key)
        .map_err(|e| GeneratorError::Config(format!("API key is not a valid header: {e}")))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
  }

  async fn generate_content(
    &self,
    request: &GenerationRequest,
  ) -> Result<String, GeneratorError> {
    if !self.has_api_key() {
      return Err(GeneratorError::Config("no API key configured".into()));
    }

    let body = GenerateContentRequest::from_request(request);

    debug!(model = %self.model, targets = ?request.targets, grounding = request.grounding, "Gemini request");

    let response = self
      .http
      .post(self.url())
      .headers(self.headers()?)
      .json(&body)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(GeneratorError::Status { status: status.as_u16(), body });
    }

    let parsed: GenerateContentResponse = response
      .json()
      .await
      .map_err(|e| GeneratorError::Decode(e.to_string()))?;

    parsed.text().ok_or(GeneratorError::Empty)
  }
}

impl Generator for GeminiClient {
  async fn generate(
    &self,
    request: &GenerationRequest,
  ) -> Result<String, GeneratorError> {
    self.generate_content(request).await
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn request(grounding: bool) -> GenerationRequest {
    GenerationRequest {
      system:      "only JSON".into(),
      instruction: "find incidents".into(),
      targets:     vec!["Regol".into()],
      grounding,
    }
  }

  #[test]
  fn request_body_carries_system_turn_and_search_tool() {
    let req = request(true);
    let body = serde_json::to_value(GenerateContentRequest::from_request(&req)).unwrap();

    assert_eq!(
      body,
      json!({
        "contents": [{ "role": "user", "parts": [{ "text": "find incidents" }] }],
        "systemInstruction": { "parts": [{ "text": "only JSON" }] },
        "tools": [{ "google_search": {} }],
      })
    );
  }

  #[test]
  fn request_body_omits_tools_without_grounding() {
    let req = request(false);
    let body = serde_json::to_value(GenerateContentRequest::from_request(&req)).unwrap();
    assert!(body.get("tools").is_none());
  }

  #[test]
  fn response_text_joins_parts_of_first_candidate() {
    let resp: GenerateContentResponse = serde_json::from_value(json!({
      "candidates": [
        { "content": { "parts": [{ "text": "[{\"a\":" }, { "text": "1}]" }] } },
        { "content": { "parts": [{ "text": "ignored" }] } }
      ]
    }))
    .unwrap();
    assert_eq!(resp.text().as_deref(), Some("[{\"a\":1}]"));
  }

  #[test]
  fn response_without_text_is_empty() {
    let none: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
    assert!(none.text().is_none());

    let blocked: GenerateContentResponse =
      serde_json::from_value(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap();
    assert!(blocked.text().is_none());
  }

  #[tokio::test]
  async fn missing_api_key_fails_each_request_without_sending() {
    // Unroutable base URL: reaching the network would surface as Transport.
    let cfg = GeneratorConfig {
      api_key:  "   ".into(),
      base_url: "http://127.0.0.1:9".into(),
      ..GeneratorConfig::default()
    };
    let client = GeminiClient::from_config(&cfg);
    assert!(!client.has_api_key());

    for _ in 0..2 {
      let result = client.generate(&request(true)).await;
      assert!(matches!(result, Err(GeneratorError::Config(_))), "got {result:?}");
    }
  }

  #[test]
  fn from_config_trims_key() {
    let cfg = GeneratorConfig { api_key: " k ".into(), ..GeneratorConfig::default() };
    let client = GeminiClient::from_config(&cfg);
    assert!(client.has_api_key());
    assert_eq!(client.headers().unwrap()["x-goog-api-key"], "k");
  }

  #[test]
  fn url_targets_model_endpoint() {
    let client = GeminiClient::new("k", "gemini-test").with_base_url("http://localhost:9/");
    assert_eq!(
      client.url(),
      "http://localhost:9/v1beta/models/gemini-test:generateContent"
    );
  }
}
