use crate::error::FasalError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

const ADVISOR_PREAMBLE: &str = "You are Kisan AI, an expert agricultural advisor for Indian farmers. \
Provide precise scientific advice on fertilizer management (dosages in kg/acre), crop cycles \
(Rabi/Kharif), and pest control (chemical and organic). Keep answers short, practical, and easy \
to understand. Reply in the same language as the user's question.";

/// A live question-answering backend.
#[async_trait]
pub trait RemoteAdvisor: Send + Sync {
    /// Answer `query`. Any failure is reported as an error, never as empty text.
    async fn advise(&self, query: &str) -> Result<String, FasalError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Advisor backed by the Gemini `generateContent` endpoint.
pub struct GeminiAdvisor {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiAdvisor {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FasalError> {
        Self::with_endpoint(
            api_key,
            DEFAULT_GEMINI_BASE_URL,
            DEFAULT_GEMINI_MODEL,
            Duration::from_secs(30),
        )
    }

    pub fn with_endpoint(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, FasalError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| FasalError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn build_request(query: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(format!("{ADVISOR_PREAMBLE}\n\nUser Query: {query}")),
            }],
        }],
    }
}

/// First candidate's first text part, if it has any content.
fn extract_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl RemoteAdvisor for GeminiAdvisor {
    async fn advise(&self, query: &str) -> Result<String, FasalError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&build_request(query))
            .send()
            .await
            .map_err(|e| FasalError::RemoteUnavailable(format!("advisor request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FasalError::RemoteUnavailable(format!(
                "advisor returned {status}"
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            FasalError::RemoteUnavailable(format!("unreadable advisor response: {e}"))
        })?;

        extract_text(body)
            .ok_or_else(|| FasalError::RemoteUnavailable("advisor returned no answer".into()))
    }

    fn backend_name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let json = serde_json::to_value(build_request("wheat khad")).unwrap();
        let text = json["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("You are Kisan AI"));
        assert!(text.ends_with("User Query: wheat khad"));
    }

    #[test]
    fn test_extract_text() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{ "candidates": [{ "content": { "parts": [{ "text": "  Use DAP.\n" }] } }] }"#,
        )
        .unwrap();
        assert_eq!(extract_text(body).as_deref(), Some("Use DAP."));
    }

    #[test]
    fn test_extract_text_missing() {
        let body: GenerateResponse = serde_json::from_str(r#"{ "candidates": [] }"#).unwrap();
        assert!(extract_text(body).is_none());

        let body: GenerateResponse =
            serde_json::from_str(r#"{ "candidates": [{ "content": { "parts": [] } }] }"#).unwrap();
        assert!(extract_text(body).is_none());

        let body: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(extract_text(body).is_none());
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let advisor =
            GeminiAdvisor::with_endpoint("k", "http://localhost:9/", "m", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            advisor.endpoint(),
            "http://localhost:9/v1beta/models/m:generateContent"
        );
    }
}
