//! Bounded memoization for embedding calls.
//!
//! Every distinct input is billed by the provider, so identical inputs
//! must not trigger duplicate network calls. The cache is an explicit
//! object with a fixed capacity and least-recently-used eviction, keyed
//! by the exact input string.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Mutex;

use tracing::{debug, trace};

use crate::embed::EmbeddingsProvider;
use crate::errors::RecError;

/// Bounded LRU map from input string to embedding vector.
///
/// Capacity is fixed at construction; inserting into a full cache drops
/// the least-recently-used entry. Not thread-safe by itself — callers
/// wrap it in a mutex.
pub struct LruCache {
    capacity: usize,
    map: HashMap<String, Vec<f32>>,
    // Most recent at the back. Small capacities (50..200 observed in
    // deployments), so linear reordering is fine.
    order: VecDeque<String>,
}

impl LruCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            map: HashMap::with_capacity(capacity.max(1)),
            order: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Looks up a key and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<Vec<f32>> {
        if let Some(v) = self.map.get(key) {
            let v = v.clone();
            self.touch(key);
            Some(v)
        } else {
            None
        }
    }

    /// Inserts a value, evicting the least-recently-used entry on
    /// overflow.
    pub fn put(&mut self, key: String, value: Vec<f32>) {
        if self.map.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        self.order.push_back(key);
        if self.map.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let k = self.order.remove(pos).unwrap();
            self.order.push_back(k);
        }
    }
}

/// Caching decorator around any [`EmbeddingsProvider`].
///
/// A hit returns the stored vector with no network call. The lock is
/// released across the inner call, so two concurrent misses for the same
/// key may race into one harmless duplicate provider call.
pub struct CachedEmbedder {
    inner: Box<dyn EmbeddingsProvider>,
    cache: Mutex<LruCache>,
}

impl CachedEmbedder {
    pub fn new(inner: Box<dyn EmbeddingsProvider>, capacity: usize) -> Self {
        debug!(capacity, "embedding cache initialized");
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of currently cached inputs.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().expect("cache mutex poisoned").len()
    }
}

impl EmbeddingsProvider for CachedEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<f32>, RecError>> + Send + 'a>>
    {
        Box::pin(async move {
            if let Some(v) = self.cache.lock().expect("cache mutex poisoned").get(text) {
                trace!(input_len = text.len(), "embedding cache hit");
                return Ok(v);
            }

            let v = self.inner.embed(text).await?;

            self.cache
                .lock()
                .expect("cache mutex poisoned")
                .put(text.to_string(), v.clone());
            trace!(input_len = text.len(), "embedding cached");
            Ok(v)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use std::sync::Arc;

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl EmbeddingsProvider for CountingProvider {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<Vec<f32>, RecError>> + Send + 'a>,
        > {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![text.len() as f32, 1.0])
            })
        }
    }

    #[test]
    fn lru_evicts_least_recently_used() {
        let mut c = LruCache::new(2);
        c.put("a".into(), vec![1.0]);
        c.put("b".into(), vec![2.0]);

        // Touch "a" so "b" becomes the eviction candidate.
        assert!(c.get("a").is_some());
        c.put("c".into(), vec![3.0]);

        assert_eq!(c.len(), 2);
        assert!(c.get("b").is_none());
        assert!(c.get("a").is_some());
        assert!(c.get("c").is_some());
    }

    #[test]
    fn lru_overwrite_keeps_single_entry() {
        let mut c = LruCache::new(2);
        c.put("a".into(), vec![1.0]);
        c.put("a".into(), vec![9.0]);
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("a").unwrap(), vec![9.0]);
    }

    #[tokio::test]
    async fn identical_inputs_cost_one_provider_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cached = CachedEmbedder::new(
            Box::new(CountingProvider {
                calls: calls.clone(),
            }),
            50,
        );

        let first = cached.embed("rust programming").await.unwrap();
        let second = cached.embed("rust programming").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.cached_len(), 1);

        // Distinct input goes out to the provider again.
        cached.embed("other").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn provider_errors_are_not_cached() {
        struct FailingProvider {
            calls: AtomicUsize,
        }
        impl EmbeddingsProvider for FailingProvider {
            fn embed<'a>(
                &'a self,
                _text: &'a str,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = Result<Vec<f32>, RecError>> + Send + 'a>,
            > {
                Box::pin(async move {
                    self.calls.fetch_add(1, Ordering::SeqCst);
                    Err(RecError::StoreRead("down".into()))
                })
            }
        }

        let cached = CachedEmbedder::new(
            Box::new(FailingProvider {
                calls: AtomicUsize::new(0),
            }),
            10,
        );
        assert!(cached.embed("x").await.is_err());
        assert_eq!(cached.cached_len(), 0);
    }
}
