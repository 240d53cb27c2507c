//! Core `CorrectionTransport` trait and `ApiCorrector` implementation.
//!
//! `ApiCorrector` calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! — Ollama (OpenAI mode), OpenAI, Groq, LM Studio, vLLM, etc.  All
//! connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{CorrectionMode, LlmConfig};
use crate::llm::prompt::PromptBuilder;

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Errors that can occur during a correction round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("correction request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse correction response: {0}")]
    Parse(String),

    /// The model returned a response with no usable text content.
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// CorrectionTransport trait
// ---------------------------------------------------------------------------

/// Async trait for the correction round trip.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (wrapped in `Arc<dyn CorrectionTransport>`).  The mode is captured by the
/// caller at dispatch time and passed explicitly — an in-flight request never
/// observes a later mode change.
#[async_trait]
pub trait CorrectionTransport: Send + Sync {
    async fn correct(&self, text: &str, mode: CorrectionMode) -> Result<String, TransportError>;
}

// ---------------------------------------------------------------------------
// ApiCorrector
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// All connection details (`base_url`, `api_key`, `model`) come exclusively
/// from the [`LlmConfig`] passed to [`ApiCorrector::from_config`].
pub struct ApiCorrector {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
    prompt_builder: PromptBuilder,
}

impl ApiCorrector {
    /// Build an `ApiCorrector` from application config plus the resolved
    /// API key (may be `None` for local providers).
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`; a default client is the last-resort fallback
    /// if the builder fails (should never happen in practice).
    pub fn from_config(config: &LlmConfig, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_key,
            prompt_builder: PromptBuilder::new(),
        }
    }
}

#[async_trait]
impl CorrectionTransport for ApiCorrector {
    /// Send `text` to the configured endpoint for correction.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when the
    /// resolved key is non-empty — safe for Ollama and other local providers
    /// that require no authentication.
    async fn correct(&self, text: &str, mode: CorrectionMode) -> Result<String, TransportError> {
        let (system_msg, user_msg) = self.prompt_builder.build_chat(text, mode);

        let url = format!("{}/v1/chat/completions", self.config.base_url);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "stream":      false,
            "temperature": self.config.temperature,
            "max_tokens":  512
        });

        let mut req = self.client.post(&url).json(&body);

        let key = self.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))?;

        let corrected = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(TransportError::EmptyResponse)?
            .trim()
            .to_string();

        if corrected.is_empty() {
            return Err(TransportError::EmptyResponse);
        }

        Ok(corrected)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    fn make_config() -> LlmConfig {
        LlmConfig {
            base_url: "http://localhost:11434".into(),
            api_key: None,
            requires_api_key: false,
            model: "qwen2.5:3b".into(),
            temperature: 0.2,
            timeout_secs: 10,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _corrector = ApiCorrector::from_config(&make_config(), None);
    }

    #[test]
    fn from_config_accepts_empty_api_key() {
        let _corrector = ApiCorrector::from_config(&make_config(), Some(String::new()));
    }

    #[test]
    fn from_config_accepts_real_api_key() {
        let _corrector = ApiCorrector::from_config(&make_config(), Some("sk-test-1234".into()));
    }

    /// Verify that `ApiCorrector` is object-safe (usable as
    /// `dyn CorrectionTransport`).
    #[test]
    fn corrector_is_object_safe() {
        let corrector: Box<dyn CorrectionTransport> =
            Box::new(ApiCorrector::from_config(&make_config(), None));
        drop(corrector);
    }
}
