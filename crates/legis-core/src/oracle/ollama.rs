//! Ollama-compatible HTTP oracle.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::{Oracle, OracleError};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Calls `POST {base_url}/api/generate` with JSON output forced.
#[derive(Debug, Clone)]
pub struct OllamaOracle {
    client: Client,
    base_url: String,
    model: String,
    default_tokens: u32,
}

impl OllamaOracle {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        default_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            default_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, prompt: &str, max_tokens: Option<u32>) -> serde_json::Value {
        let tokens = max_tokens.unwrap_or(self.default_tokens);
        let mut body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "format": "json",
        });
        if tokens > 0 {
            body["options"] = json!({ "num_predict": tokens });
        }
        body
    }
}

impl Oracle for OllamaOracle {
    fn generate_json(&self, prompt: &str, max_tokens: Option<u32>) -> Result<String, OracleError> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(model = %self.model, prompt_chars = prompt.len(), "oracle request");

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(prompt, max_tokens))
            .send()
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(OracleError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| OracleError::Transport(e.to_string()))?;
        parsed.response.ok_or(OracleError::MissingField("response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle() -> OllamaOracle {
        OllamaOracle::new("http://localhost:11434/", "gemma2:2b", 200, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_request_body_uses_override() {
        let body = oracle().request_body("hi", Some(800));
        assert_eq!(body["model"], "gemma2:2b");
        assert_eq!(body["format"], "json");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 800);
    }

    #[test]
    fn test_request_body_default_budget() {
        let body = oracle().request_body("hi", None);
        assert_eq!(body["options"]["num_predict"], 200);

        let body = oracle().request_body("hi", Some(0));
        assert!(body.get("options").is_none());
    }

    #[test]
    fn test_base_url_is_normalized() {
        assert_eq!(oracle().base_url, "http://localhost:11434");
    }
}
