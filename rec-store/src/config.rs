//! Runtime and collection configuration.

use crate::errors::RecError;

/// Which vector store backend to run against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Qdrant over gRPC (production).
    Qdrant,
    /// In-process exact cosine scan (tests, single-node deployments).
    Memory,
}

impl StoreBackend {
    /// Parses `"qdrant"` / `"memory"` (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, RecError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qdrant" => Ok(StoreBackend::Qdrant),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(RecError::Config(format!("unknown store backend: {other}"))),
        }
    }
}

/// Configuration for the vector store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Backend selection.
    pub backend: StoreBackend,
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Embedding dimensionality. Fixed for the lifetime of the store;
    /// a mismatch is a configuration error, not a recoverable state.
    pub embedding_dim: usize,
}

impl StoreConfig {
    /// Creates a sane default config for a given collection and endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>, dim: usize) -> Self {
        Self {
            backend: StoreBackend::Qdrant,
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            embedding_dim: dim,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RecError> {
        if self.embedding_dim == 0 {
            return Err(RecError::Config("embedding_dim must be > 0".into()));
        }
        if self.backend == StoreBackend::Qdrant {
            if self.qdrant_url.trim().is_empty() {
                return Err(RecError::Config("qdrant_url is empty".into()));
            }
            if self.collection.trim().is_empty() {
                return Err(RecError::Config("collection is empty".into()));
            }
        }
        Ok(())
    }
}

/// Configuration for the recommendation query service.
#[derive(Clone, Debug)]
pub struct RecommendConfig {
    /// Maximum accepted query length in characters.
    pub max_query_chars: usize,
    /// Result count when the caller does not ask for one.
    pub default_k: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            max_query_chars: 100,
            default_k: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_known_names() {
        assert_eq!(StoreBackend::parse("Qdrant").unwrap(), StoreBackend::Qdrant);
        assert_eq!(StoreBackend::parse(" memory ").unwrap(), StoreBackend::Memory);
        assert!(StoreBackend::parse("chroma").is_err());
    }

    #[test]
    fn qdrant_config_requires_url_and_collection() {
        let mut cfg = StoreConfig::new_default("", "content", 4);
        assert!(cfg.validate().is_err());
        cfg.qdrant_url = "http://localhost:6334".into();
        assert!(cfg.validate().is_ok());
        cfg.embedding_dim = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn memory_backend_ignores_qdrant_fields() {
        let cfg = StoreConfig {
            backend: StoreBackend::Memory,
            qdrant_url: String::new(),
            qdrant_api_key: None,
            collection: String::new(),
            embedding_dim: 4,
        };
        assert!(cfg.validate().is_ok());
    }
}
