//! Configuration for the embedding provider client.

use crate::errors::{EmbedError, Result};

/// Configuration for an embeddings invocation.
///
/// The model identifier and endpoint are deployment choices, never
/// hardcoded by callers.
#[derive(Debug, Clone)]
pub struct EmbedModelConfig {
    /// Model identifier string (e.g., `"text-embedding-3-small"`).
    pub model: String,

    /// Provider base endpoint (e.g., `https://api.openai.com`).
    /// `/v1/embeddings` is appended by the client.
    pub endpoint: String,

    /// Bearer token for authentication.
    pub api_key: Option<String>,

    /// Request timeout in seconds. Defaults to 60 when `None`.
    pub timeout_secs: Option<u64>,

    /// Maximum accepted input length in characters. Longer inputs are
    /// rejected with [`EmbedError::InputTooLarge`]; the client never
    /// truncates silently.
    pub max_input_chars: usize,
}

impl EmbedModelConfig {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(EmbedError::Config("model is empty".into()));
        }
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(EmbedError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.max_input_chars == 0 {
            return Err(EmbedError::Config("max_input_chars must be > 0".into()));
        }
        Ok(())
    }
}
