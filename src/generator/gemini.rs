//! Gemini API generator
//!
//! Implements BioGenerator by calling the Gemini `generateContent`
//! endpoint over HTTP. The API key is read from the process environment
//! at call time; its absence is a generation failure, not a startup
//! error. Failures are never retried automatically.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::GeneratorSettings;
use crate::error::{Error, Result};

use super::{BioGenerator, BioRequest};

/// Environment variables checked for the API key, in order.
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

// ─────────────────────────────────────────────────────────────────
// Gemini API types (request/response)
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Gemini Generator
// ─────────────────────────────────────────────────────────────────

/// Bio generator backed by the Gemini API
pub struct GeminiGenerator {
    settings: GeneratorSettings,
    client: Client,
}

impl GeminiGenerator {
    /// Create a new Gemini generator with the given settings
    pub fn new(settings: GeneratorSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            base_url = %settings.base_url,
            model = %settings.model,
            "Gemini generator created"
        );

        Self { settings, client }
    }

    /// Read the API key from the process environment.
    ///
    /// Checked at call time so the portal starts fine without a key and
    /// only generation attempts fail.
    fn api_key_from_env() -> Result<String> {
        for var in API_KEY_VARS {
            if let Ok(key) = env::var(var) {
                if !key.trim().is_empty() {
                    return Ok(key);
                }
            }
        }
        Err(Error::CredentialMissing {
            checked: API_KEY_VARS.join(", "),
        })
    }

    /// Extract the first candidate's text from a parsed response
    fn extract_text(response: GenerateContentResponse) -> Result<String> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| Error::generation_malformed("no candidates in response"))?;

        let content = candidate
            .content
            .ok_or_else(|| Error::generation_malformed("candidate has no content"))?;

        let text: String = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(Error::generation_malformed("candidate text is empty"));
        }

        Ok(text)
    }
}

#[async_trait]
impl BioGenerator for GeminiGenerator {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &BioRequest) -> Result<String> {
        let api_key = Self::api_key_from_env()?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.settings.base_url, self.settings.model
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.prompt(),
                }],
            }],
        };

        debug!(model = %self.settings.model, "Sending bio generation request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Bio generation request failed");
                Error::generation_request_failed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, "Bio generation API returned an error");
            return Err(Error::GenerationUpstreamError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::generation_malformed(e.to_string()))?;

        Self::extract_text(parsed)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_text(text: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![CandidatePart {
                        text: Some(text.to_string()),
                    }],
                }),
            }],
        }
    }

    #[test]
    fn test_generator_name() {
        let generator = GeminiGenerator::new(GeneratorSettings::default());
        assert_eq!(generator.name(), "gemini");
    }

    #[test]
    fn test_extract_text_happy_path() {
        let text = GeminiGenerator::extract_text(response_with_text("A fine bio.")).unwrap();
        assert_eq!(text, "A fine bio.");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![
                        CandidatePart {
                            text: Some("Part one. ".to_string()),
                        },
                        CandidatePart {
                            text: Some("Part two.".to_string()),
                        },
                    ],
                }),
            }],
        };
        let text = GeminiGenerator::extract_text(response).unwrap();
        assert_eq!(text, "Part one. Part two.");
    }

    #[test]
    fn test_extract_text_no_candidates() {
        let response = GenerateContentResponse { candidates: vec![] };
        let err = GeminiGenerator::extract_text(response).unwrap_err();
        assert!(err.is_generation_failure());
    }

    #[test]
    fn test_extract_text_empty_parts() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent { parts: vec![] }),
            }],
        };
        assert!(GeminiGenerator::extract_text(response).is_err());
    }

    #[test]
    fn test_response_parsing_from_json() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hello there."}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        let text = GeminiGenerator::extract_text(parsed).unwrap();
        assert_eq!(text, "Hello there.");
    }

    #[test]
    fn test_request_serialization_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "a prompt".to_string(),
                }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "a prompt");
    }
}
