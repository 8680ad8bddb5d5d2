//! The generative text backend capability.
//!
//! One fallible operation, modeled as an infallible call that returns
//! empty text on any failure (quota, network, malformed response).
//! Callers are structurally forced to handle the empty case, which is
//! exactly the fallback path they need anyway.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use shopmind_core::config::AiConfig;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Empty string means "no usable output"; this call never errors and
    /// never hangs past the client's bounded timeout.
    async fn generate_text(&self, prompt: &str) -> String;
}

/// Offline generator: always empty, so every caller exercises its
/// deterministic fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopGenerator;

#[async_trait]
impl TextGenerator for NoopGenerator {
    async fn generate_text(&self, _prompt: &str) -> String {
        String::new()
    }
}

/// Asks the generator for a JSON object. Any failure along the way,
/// including text that is not a JSON object, collapses to an empty map.
pub async fn generate_json(
    generator: &dyn TextGenerator,
    prompt: &str,
) -> serde_json::Map<String, serde_json::Value> {
    let text = generator.generate_text(prompt).await;
    match serde_json::from_str::<serde_json::Value>(strip_code_fence(&text)) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    }
}

/// Models sometimes wrap JSON in a markdown fence despite instructions;
/// tolerate that one decoration.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Gemini `generateContent` client over HTTPS.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// `None` when no API key is configured or the HTTP client cannot be
    /// built; callers should fall back to [`NoopGenerator`].
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let http = match reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
        {
            Ok(http) => http,
            Err(error) => {
                warn!(event_name = "ai.client.build_failed", %error, "falling back to offline mode");
                return None;
            }
        };
        Some(Self {
            http,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> String {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: vec![RequestContent { parts: vec![RequestPart { text: prompt }] }],
        };

        let response = match self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(event_name = "ai.generate.request_failed", %error, "returning empty text");
                return String::new();
            }
        };

        if !response.status().is_success() {
            // Commonly 429 RESOURCE_EXHAUSTED on free-tier quota.
            warn!(
                event_name = "ai.generate.http_error",
                status = %response.status(),
                "returning empty text"
            );
            return String::new();
        }

        let parsed: GenerateResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(event_name = "ai.generate.decode_failed", %error, "returning empty text");
                return String::new();
            }
        };

        let text = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content.parts.iter().map(|part| part.text.as_str()).collect::<Vec<_>>().join("")
            })
            .unwrap_or_default();
        text.trim().to_string()
    }
}
