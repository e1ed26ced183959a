// src/providers/gemini.rs

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::config::GeminiConfig;
use crate::errors::{EvalError, Result};
use crate::models::{EvaluationRequest, SYSTEM_INSTRUCTION};
use crate::providers::LlmProvider;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
    pub system_instruction: Content<'a>,
}

#[derive(Serialize, Debug)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
pub struct Part<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn new(user_query: &'a str) -> Self {
        Self {
            contents: vec![Content { parts: vec![Part { text: user_query }] }],
            system_instruction: Content { parts: vec![Part { text: SYSTEM_INSTRUCTION }] },
        }
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a `generateContent` body.
///
/// A body without a first candidate is malformed. A candidate whose text
/// cannot be reached is unparseable.
pub fn extract_candidate_text(body: &Value) -> Result<&str> {
    let candidate = body
        .get("candidates")
        .and_then(|c| c.get(0))
        .ok_or_else(|| EvalError::MalformedResponse(body.to_string()))?;

    candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| EvalError::UnparseableResponse(candidate.to_string()))
}

/// A provider for Google's Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`.
    pub fn new(client: Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    /// Builds the HTTP client from config, applying the optional request timeout.
    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self::new(builder.build()?, config))
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl LlmProvider for GeminiProvider {
    async fn send(&self, request: &EvaluationRequest) -> Result<Value> {
        let url = self.endpoint();
        let user_query = request.user_query();
        let body = GenerateContentRequest::new(&user_query);

        log::debug!("Calling Gemini: {} with model: {}", url, self.config.model);

        let mut builder = self.client.post(&url).json(&body);
        if !self.config.api_key.is_empty() {
            builder = builder.header("x-goog-api-key", &self.config.api_key);
        }

        let start = Instant::now();
        let resp = builder.send().await?;

        let status = resp.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        log::debug!("Gemini response status: {} ({}ms)", status, latency_ms);

        if !status.is_success() {
            let error_body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_string());
            return Err(EvalError::ApiError {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let raw = resp.text().await?;
        serde_json::from_str(&raw).map_err(|e| EvalError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let query = EvaluationRequest::new("p", "t").user_query();
        let value = serde_json::to_value(GenerateContentRequest::new(&query)).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], json!(query));
        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            json!(SYSTEM_INSTRUCTION)
        );
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_extract_candidate_text() {
        let body = json!({
            "candidates": [{"content": {"parts": [{"text": "88"}]}}]
        });
        assert_eq!(extract_candidate_text(&body).unwrap(), "88");
    }

    #[test]
    fn test_missing_candidates_is_malformed() {
        for body in [json!({}), json!({"candidates": []}), json!({"candidates": null})] {
            assert!(matches!(
                extract_candidate_text(&body),
                Err(EvalError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn test_candidate_without_text_is_unparseable() {
        for body in [
            json!({"candidates": [{}]}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": 42}]}}]}),
        ] {
            assert!(matches!(
                extract_candidate_text(&body),
                Err(EvalError::UnparseableResponse(_))
            ));
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = GeminiConfig {
            api_base: "http://localhost:1234/".to_string(),
            model: "gemini-test".to_string(),
            ..GeminiConfig::default()
        };
        let provider = GeminiProvider::new(Client::new(), config);
        assert_eq!(
            provider.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-test:generateContent"
        );
    }
}
