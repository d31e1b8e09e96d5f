//! OpenAI-compatible embeddings service.
//!
//! Minimal, non-streaming client around `POST {endpoint}/v1/embeddings`.
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! One invocation performs exactly one network call. There is no retry
//! logic here; an operator-facing force refresh is the retry mechanism
//! further up the stack.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::EmbedModelConfig;
use crate::errors::{EmbedError, Result, make_snippet};

/// Thin client for an OpenAI-compatible embeddings API.
///
/// Constructed from a complete [`EmbedModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
#[derive(Debug)]
pub struct OpenAiEmbedService {
    client: reqwest::Client,
    cfg: EmbedModelConfig,
    url_embeddings: String,
}

impl OpenAiEmbedService {
    /// Creates a new service from the given config.
    ///
    /// # Errors
    /// - [`EmbedError::MissingApiKey`] if `cfg.api_key` is `None`
    /// - [`EmbedError::InvalidEndpoint`] if the endpoint scheme is invalid
    /// - [`EmbedError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: EmbedModelConfig) -> Result<Self> {
        cfg.validate()?;

        let api_key = cfg.api_key.clone().ok_or(EmbedError::MissingApiKey)?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| EmbedError::Decode(format!("invalid API key header: {e}")))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        let url_embeddings = format!("{}/v1/embeddings", base);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "OpenAiEmbedService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_embeddings,
        })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Retrieves a single embeddings vector via `/v1/embeddings`.
    ///
    /// # Errors
    /// - [`EmbedError::EmptyInput`] for empty input
    /// - [`EmbedError::InputTooLarge`] when the input exceeds the
    ///   configured limit (nothing is truncated)
    /// - [`EmbedError::HttpStatus`] for non-2xx responses
    /// - [`EmbedError::Transport`] for client/network failures
    /// - [`EmbedError::Decode`] if the JSON cannot be parsed or `data`
    ///   is empty
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        if input.trim().is_empty() {
            return Err(EmbedError::EmptyInput);
        }
        if input.chars().count() > self.cfg.max_input_chars {
            return Err(EmbedError::InputTooLarge {
                len: input.chars().count(),
                max: self.cfg.max_input_chars,
            });
        }

        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };

        debug!(
            model = %self.cfg.model,
            input_len = input.len(),
            "POST {}", self.url_embeddings
        );

        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "embeddings endpoint returned non-success status"
            );

            return Err(EmbedError::HttpStatus {
                status,
                url,
                snippet,
            });
        }

        let out: EmbeddingsResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode /v1/embeddings response"
                );
                return Err(EmbedError::Decode(format!(
                    "serde error: {e}; expected `data[0].embedding`"
                )));
            }
        };

        let first = out
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::Decode("empty `data` in embeddings response".into()))?;

        info!(
            model = %self.cfg.model,
            dim = first.embedding.len(),
            latency_ms = started.elapsed().as_millis(),
            "embeddings completed"
        );

        Ok(first.embedding)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/v1/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Response shape: `{ "data": [ { "embedding": [...] } ] }`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingsDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsDatum {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> EmbedModelConfig {
        EmbedModelConfig {
            model: "text-embedding-3-small".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-test".into()),
            timeout_secs: Some(5),
            max_input_chars: 16,
        }
    }

    #[test]
    fn request_body_serializes_model_and_input() {
        let body = EmbeddingsRequest {
            model: "m",
            input: "hello",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["input"], "hello");
    }

    #[test]
    fn response_decodes_first_datum() {
        let raw = r#"{"data":[{"embedding":[0.1,0.2]},{"embedding":[0.3]}]}"#;
        let out: EmbeddingsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(out.data[0].embedding, vec![0.1, 0.2]);
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let mut c = cfg();
        c.api_key = None;
        assert!(matches!(
            OpenAiEmbedService::new(c),
            Err(EmbedError::MissingApiKey)
        ));
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        let mut c = cfg();
        c.endpoint = "ftp://example.com".into();
        assert!(matches!(
            OpenAiEmbedService::new(c),
            Err(EmbedError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn empty_and_oversized_inputs_fail_before_any_network_call() {
        let svc = OpenAiEmbedService::new(cfg()).unwrap();

        assert!(matches!(
            svc.embeddings("   ").await,
            Err(EmbedError::EmptyInput)
        ));
        assert!(matches!(
            svc.embeddings("this input is definitely too long").await,
            Err(EmbedError::InputTooLarge { max: 16, .. })
        ));
    }
}
