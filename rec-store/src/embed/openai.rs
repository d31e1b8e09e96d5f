//! OpenAI-compatible embedding provider implementation.
//!
//! Wraps [`embed_client::OpenAiEmbedService`] and enforces the store's
//! fixed vector dimensionality.

use std::sync::Arc;

use embed_client::OpenAiEmbedService;

use crate::embed::EmbeddingsProvider;
use crate::errors::RecError;

/// Embedding provider backed by an OpenAI-compatible HTTP API (async).
#[derive(Clone)]
pub struct OpenAiEmbedder {
    svc: Arc<OpenAiEmbedService>,
    dim: usize,
}

impl OpenAiEmbedder {
    /// Construct a new embedder over a shared service handle.
    ///
    /// `dim` is the expected embedding dimensionality; vectors of any
    /// other size are rejected.
    pub fn new(svc: Arc<OpenAiEmbedService>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for OpenAiEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, RecError>> + Send + 'a>>
    {
        Box::pin(async move {
            let v = self.svc.embeddings(text).await?;

            if v.len() != self.dim {
                return Err(RecError::VectorSizeMismatch {
                    got: v.len(),
                    want: self.dim,
                });
            }

            Ok(v)
        })
    }
}
