//! Recommendation query service: embed the query, search, rank.

use tracing::{debug, trace};

use crate::config::RecommendConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::RecError;
use crate::record::QueryResult;
use crate::store::VectorStore;

/// Returns the top-K stored items most similar to `query_text`.
///
/// Scores are cosine similarity (1.0 = perfect match, negative for
/// opposite vectors), ordered descending. An empty store yields an empty
/// sequence, not an error.
///
/// # Errors
/// - [`RecError::InvalidQuery`] for empty or over-length queries
/// - Provider and store errors are fatal to this single request and
///   surface with their kind — no silent empty-result masking.
pub async fn recommend(
    query_text: &str,
    k: usize,
    store: &dyn VectorStore,
    embedder: &dyn EmbeddingsProvider,
    cfg: &RecommendConfig,
) -> Result<Vec<QueryResult>, RecError> {
    let trimmed = query_text.trim();
    if trimmed.is_empty() {
        return Err(RecError::InvalidQuery("query text is empty".into()));
    }
    let len = trimmed.chars().count();
    if len > cfg.max_query_chars {
        return Err(RecError::InvalidQuery(format!(
            "query of {len} chars exceeds limit of {}",
            cfg.max_query_chars
        )));
    }

    let k = if k == 0 { cfg.default_k } else { k };
    trace!(k, query_len = len, "recommend");

    let query_vector = embedder.embed(trimmed).await?;
    let hits = store.top_k(query_vector, k).await?;

    let out: Vec<QueryResult> = hits
        .into_iter()
        .map(|(item, score)| QueryResult {
            title: item.title,
            url: item.url,
            description: item.description,
            thumbnail: item.thumbnail,
            category: item.category,
            score,
        })
        .collect();

    debug!(hits = out.len(), "recommend completed");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ContentCategory, ContentItem};
    use crate::store::MemoryStore;

    struct AxisProvider;

    // Maps a few known queries onto fixed directions.
    impl EmbeddingsProvider for AxisProvider {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<Vec<f32>, RecError>> + Send + 'a>,
        > {
            Box::pin(async move {
                Ok(match text {
                    "programming" => vec![1.0, 0.0],
                    _ => vec![0.0, 1.0],
                })
            })
        }
    }

    fn item(id: &str, category: ContentCategory, embedding: Vec<f32>) -> ContentItem {
        ContentItem {
            id: id.into(),
            title: Some(id.to_string()),
            url: format!("https://example.com/{id}"),
            description: Some("d".into()),
            thumbnail: None,
            category,
            source_text: id.into(),
            embedding,
        }
    }

    #[tokio::test]
    async fn results_are_ranked_descending_and_merged_across_categories() {
        let store = MemoryStore::new(2);
        store
            .upsert(&item("rust-post", ContentCategory::Blog, vec![0.9, 0.1]))
            .await
            .unwrap();
        store
            .upsert(&item("cooking-video", ContentCategory::Video, vec![0.0, 1.0]))
            .await
            .unwrap();
        store
            .upsert(&item("rust-video", ContentCategory::Video, vec![1.0, 0.0]))
            .await
            .unwrap();

        let results = recommend(
            "programming",
            3,
            &store,
            &AxisProvider,
            &RecommendConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].url, "https://example.com/rust-video");
        assert!((results[0].score - 1.0).abs() < 1e-6);
        for w in results.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
        // Both categories appear in one merged ranking.
        assert!(results.iter().any(|r| r.category == ContentCategory::Blog));
    }

    #[tokio::test]
    async fn empty_store_yields_empty_sequence() {
        let store = MemoryStore::new(2);
        let results = recommend(
            "anything",
            5,
            &store,
            &AxisProvider,
            &RecommendConfig::default(),
        )
        .await
        .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn empty_and_overlong_queries_are_rejected() {
        let store = MemoryStore::new(2);
        let cfg = RecommendConfig::default();

        let err = recommend("   ", 5, &store, &AxisProvider, &cfg)
            .await
            .unwrap_err();
        assert!(matches!(err, RecError::InvalidQuery(_)));

        let long = "q".repeat(cfg.max_query_chars + 1);
        let err = recommend(&long, 5, &store, &AxisProvider, &cfg)
            .await
            .unwrap_err();
        assert!(matches!(err, RecError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn zero_k_falls_back_to_default() {
        let store = MemoryStore::new(2);
        for i in 0..8 {
            store
                .upsert(&item(
                    &format!("p{i}"),
                    ContentCategory::Blog,
                    vec![1.0, i as f32 / 10.0],
                ))
                .await
                .unwrap();
        }

        let results = recommend(
            "programming",
            0,
            &store,
            &AxisProvider,
            &RecommendConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(results.len(), 5);
    }
}
