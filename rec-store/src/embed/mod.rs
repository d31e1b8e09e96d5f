//! Embedding provider abstraction.
//!
//! Async is required because real providers perform HTTP requests.

use crate::errors::RecError;
use std::{future::Future, pin::Pin};

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in your own embedding backend.
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function. One distinct input, one vector.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RecError>> + Send + 'a>>;
}

pub mod cache;
pub mod openai;

pub use cache::CachedEmbedder;
pub use openai::OpenAiEmbedder;
