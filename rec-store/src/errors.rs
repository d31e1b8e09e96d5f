//! Unified error types for the crate.

use embed_client::EmbedError;
use thiserror::Error;

/// Top-level error for rec-store operations.
#[derive(Debug, Error)]
pub enum RecError {
    /// Embedding provider call failed (HTTP, decode, auth).
    #[error("provider error: {0}")]
    Provider(#[source] EmbedError),

    /// Input text exceeded the provider limit; nothing was truncated.
    #[error("provider limit exceeded: {len} chars > {max}")]
    ProviderLimitExceeded { len: usize, max: usize },

    /// Content source unreachable or returned a malformed page.
    #[error("source fetch error: {0}")]
    SourceFetch(String),

    /// Vector store rejected or failed a write.
    #[error("store write error: {0}")]
    StoreWrite(String),

    /// Vector store read/search failure.
    #[error("store read error: {0}")]
    StoreRead(String),

    /// Query text was empty or over the configured length limit.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Mismatch in vector dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EmbedError> for RecError {
    fn from(e: EmbedError) -> Self {
        match e {
            EmbedError::InputTooLarge { len, max } => RecError::ProviderLimitExceeded { len, max },
            other => RecError::Provider(other),
        }
    }
}
