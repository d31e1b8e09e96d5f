//! Vector store contract and backends.
//!
//! The core depends only on these four operations; Qdrant and the
//! in-memory index are interchangeable behind them, selected by
//! configuration.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::errors::RecError;
use crate::record::{ContentItem, StoredItem};

/// Persistence contract for embedded content.
///
/// Scores returned by [`VectorStore::top_k`] are cosine similarity on the
/// 1-is-best scale, regardless of what the backend natively computes.
/// Results are ordered descending; ties break by insertion order.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Existence lookup by content identifier.
    async fn exists(&self, id: &str) -> Result<bool, RecError>;

    /// Bulk form of [`VectorStore::exists`] — one call per sync run.
    /// The identifier namespace is global across categories.
    async fn existing_keys(&self) -> Result<HashSet<String>, RecError>;

    /// Inserts or fully replaces one item. Atomic per item: no record is
    /// ever visible without its embedding.
    async fn upsert(&self, item: &ContentItem) -> Result<(), RecError>;

    /// Top-K similarity search against a query vector.
    async fn top_k(
        &self,
        vector: Vec<f32>,
        k: usize,
    ) -> Result<Vec<(StoredItem, f32)>, RecError>;
}

pub mod memory;
pub mod qdrant;
mod qdrant_facade;

pub use memory::MemoryStore;
pub use qdrant::QdrantStore;
