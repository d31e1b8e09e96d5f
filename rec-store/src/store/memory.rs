//! In-process vector store with exact cosine scan.
//!
//! Keeps full items in a map keyed by content id, plus an insertion
//! sequence number so equal scores rank deterministically. Suitable for
//! tests and small single-node deployments.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::RecError;
use crate::record::{ContentItem, StoredItem};
use crate::store::VectorStore;

struct Entry {
    seq: u64,
    item: ContentItem,
}

/// Exact-scan in-memory store.
pub struct MemoryStore {
    dim: usize,
    inner: Mutex<Inner>,
}

struct Inner {
    next_seq: u64,
    entries: HashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            inner: Mutex::new(Inner {
                next_seq: 0,
                entries: HashMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored vector for an id, for overwrite assertions in tests.
    pub fn vector_of(&self, id: &str) -> Option<Vec<f32>> {
        self.inner
            .lock()
            .expect("store mutex poisoned")
            .entries
            .get(id)
            .map(|e| e.item.embedding.clone())
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn exists(&self, id: &str) -> Result<bool, RecError> {
        Ok(self
            .inner
            .lock()
            .expect("store mutex poisoned")
            .entries
            .contains_key(id))
    }

    async fn existing_keys(&self) -> Result<HashSet<String>, RecError> {
        Ok(self
            .inner
            .lock()
            .expect("store mutex poisoned")
            .entries
            .keys()
            .cloned()
            .collect())
    }

    async fn upsert(&self, item: &ContentItem) -> Result<(), RecError> {
        if item.embedding.len() != self.dim {
            return Err(RecError::StoreWrite(format!(
                "vector size mismatch: got {}, want {}",
                item.embedding.len(),
                self.dim
            )));
        }

        let mut inner = self.inner.lock().expect("store mutex poisoned");
        // Overwrites keep their original insertion rank.
        let seq = match inner.entries.get(&item.id) {
            Some(e) => e.seq,
            None => {
                let s = inner.next_seq;
                inner.next_seq += 1;
                s
            }
        };
        inner.entries.insert(
            item.id.clone(),
            Entry {
                seq,
                item: item.clone(),
            },
        );
        Ok(())
    }

    async fn top_k(
        &self,
        vector: Vec<f32>,
        k: usize,
    ) -> Result<Vec<(StoredItem, f32)>, RecError> {
        if vector.len() != self.dim {
            return Err(RecError::StoreRead(format!(
                "query vector size mismatch: got {}, want {}",
                vector.len(),
                self.dim
            )));
        }

        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut scored: Vec<(u64, StoredItem, f32)> = inner
            .entries
            .values()
            .map(|e| {
                let score = cosine_similarity(&vector, &e.item.embedding);
                (
                    e.seq,
                    StoredItem {
                        id: e.item.id.clone(),
                        title: e.item.title.clone(),
                        url: e.item.url.clone(),
                        description: e.item.description.clone(),
                        thumbnail: e.item.thumbnail.clone(),
                        category: e.item.category,
                    },
                    score,
                )
            })
            .collect();

        // Descending score; equal scores keep insertion order.
        scored.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(k);

        Ok(scored.into_iter().map(|(_, item, s)| (item, s)).collect())
    }
}

/// Cosine similarity, 1.0 for identical directions. Zero-norm vectors
/// score 0 rather than dividing by zero.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na < f32::EPSILON || nb < f32::EPSILON {
        return 0.0;
    }
    dot / (na * nb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ContentCategory;

    fn item(id: &str, embedding: Vec<f32>) -> ContentItem {
        ContentItem {
            id: id.into(),
            title: Some(id.to_uppercase()),
            url: format!("https://example.com/{id}"),
            description: None,
            thumbnail: None,
            category: ContentCategory::Blog,
            source_text: id.into(),
            embedding,
        }
    }

    #[tokio::test]
    async fn upsert_rejects_wrong_dimensionality() {
        let store = MemoryStore::new(3);
        let err = store.upsert(&item("a", vec![1.0])).await.unwrap_err();
        assert!(matches!(err, RecError::StoreWrite(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn top_k_orders_by_descending_score() {
        let store = MemoryStore::new(2);
        store.upsert(&item("far", vec![0.0, 1.0])).await.unwrap();
        store.upsert(&item("near", vec![1.0, 0.1])).await.unwrap();
        store.upsert(&item("mid", vec![1.0, 1.0])).await.unwrap();

        let hits = store.top_k(vec![1.0, 0.0], 10).await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|(i, _)| i.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        for w in hits.windows(2) {
            assert!(w[0].1 >= w[1].1);
        }
    }

    #[tokio::test]
    async fn ties_break_by_insertion_order() {
        let store = MemoryStore::new(2);
        // Same direction, same score against any query.
        store.upsert(&item("first", vec![1.0, 0.0])).await.unwrap();
        store.upsert(&item("second", vec![2.0, 0.0])).await.unwrap();

        let hits = store.top_k(vec![1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits[0].0.id, "first");
        assert_eq!(hits[1].0.id, "second");
    }

    #[tokio::test]
    async fn overwrite_replaces_vector_and_keeps_rank() {
        let store = MemoryStore::new(2);
        store.upsert(&item("a", vec![1.0, 0.0])).await.unwrap();
        store.upsert(&item("b", vec![1.0, 0.0])).await.unwrap();
        store.upsert(&item("a", vec![0.0, 1.0])).await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.vector_of("a").unwrap(), vec![0.0, 1.0]);

        // "a" still ranks before "b" on equal scores.
        let hits = store.top_k(vec![1.0, 1.0], 2).await.unwrap();
        assert_eq!(hits[0].0.id, "a");
    }

    #[tokio::test]
    async fn existing_keys_reflects_all_ids() {
        let store = MemoryStore::new(1);
        store.upsert(&item("x", vec![1.0])).await.unwrap();
        store.upsert(&item("y", vec![2.0])).await.unwrap();

        let keys = store.existing_keys().await.unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("x") && keys.contains("y"));
        assert!(store.exists("x").await.unwrap());
        assert!(!store.exists("z").await.unwrap());
    }

    #[test]
    fn cosine_handles_zero_vectors() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        let s = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((s + 1.0).abs() < 1e-6);
    }
}
