//! Qdrant-backed vector store.
//!
//! Point ids are deterministic UUIDv5 digests of the content id, so
//! re-upserting the same item always lands on the same point (overwrite,
//! never duplicate). The payload carries everything needed to re-rank
//! and display a hit without fetching the source again.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use qdrant_client::qdrant::{
    PointId, PointStruct, Value as QValue, Vector, Vectors, value, vectors,
};
use tracing::warn;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::errors::RecError;
use crate::record::{ContentCategory, ContentItem, StoredItem};
use crate::store::VectorStore;
use crate::store::qdrant_facade::QdrantFacade;

/// Qdrant store for embedded content.
pub struct QdrantStore {
    facade: QdrantFacade,
    dim: usize,
}

impl QdrantStore {
    /// Builds the client and ensures the collection exists with the
    /// configured dimensionality.
    pub async fn connect(cfg: &StoreConfig) -> Result<Self, RecError> {
        let facade = QdrantFacade::new(cfg)?;
        facade.ensure_collection(cfg.embedding_dim).await?;
        Ok(Self {
            facade,
            dim: cfg.embedding_dim,
        })
    }

    fn build_point(&self, item: &ContentItem) -> Result<PointStruct, RecError> {
        if item.embedding.len() != self.dim {
            return Err(RecError::StoreWrite(format!(
                "vector size mismatch: got {}, want {}",
                item.embedding.len(),
                self.dim
            )));
        }

        let mut payload: HashMap<String, QValue> = HashMap::new();
        payload.insert("content_id".into(), qstring(&item.id));
        payload.insert("url".into(), qstring(&item.url));
        payload.insert("text".into(), qstring(&item.source_text));
        payload.insert(
            "content_category_id".into(),
            QValue {
                kind: Some(value::Kind::IntegerValue(item.category.as_i64())),
            },
        );
        payload.insert("embedded_at".into(), qstring(&Utc::now().to_rfc3339()));
        if let Some(title) = &item.title {
            payload.insert("title".into(), qstring(title));
        }
        if let Some(description) = &item.description {
            payload.insert("description".into(), qstring(description));
        }
        if let Some(thumbnail) = &item.thumbnail {
            payload.insert("thumbnail".into(), qstring(thumbnail));
        }

        let pid: PointId = stable_uuid(&item.id).to_string().into();

        let vectors = Vectors {
            vectors_options: Some(vectors::VectorsOptions::Vector(Vector {
                data: item.embedding.clone(),
                indices: None,
                vectors_count: None,
                vector: None,
            })),
        };

        Ok(PointStruct {
            id: Some(pid),
            payload,
            vectors: Some(vectors),
            ..Default::default()
        })
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn exists(&self, id: &str) -> Result<bool, RecError> {
        self.facade
            .has_point(stable_uuid(id).to_string())
            .await
    }

    async fn existing_keys(&self) -> Result<HashSet<String>, RecError> {
        let points = self.facade.scroll_payloads().await?;
        Ok(points
            .into_iter()
            .filter_map(|p| get_str(&p.payload, "content_id"))
            .collect())
    }

    async fn upsert(&self, item: &ContentItem) -> Result<(), RecError> {
        let point = self.build_point(item)?;
        self.facade.upsert_points(vec![point]).await
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

        let hits = self.facade.search(vector, k as u64).await?;
        let mut out = Vec::with_capacity(hits.len());
        for (score, payload) in hits {
            match payload_to_item(&payload) {
                Some(item) => out.push((item, score)),
                None => warn!("dropping search hit with malformed payload"),
            }
        }
        Ok(out)
    }
}

/// Deterministic UUIDv5 from an arbitrary content id.
fn stable_uuid(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, id.as_bytes())
}

/// Wraps a string into a Qdrant `Value`.
fn qstring(s: &str) -> QValue {
    QValue {
        kind: Some(value::Kind::StringValue(s.to_string())),
    }
}

fn get_str(payload: &HashMap<String, QValue>, key: &str) -> Option<String> {
    match payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(value::Kind::StringValue(s)) => Some(s.clone()),
        _ => None,
    }
}

fn get_i64(payload: &HashMap<String, QValue>, key: &str) -> Option<i64> {
    match payload.get(key).and_then(|v| v.kind.as_ref()) {
        Some(value::Kind::IntegerValue(i)) => Some(*i),
        _ => None,
    }
}

/// Converts a search payload back into a display projection. `None` for
/// payloads missing the mandatory id/url/category fields.
fn payload_to_item(payload: &HashMap<String, QValue>) -> Option<StoredItem> {
    Some(StoredItem {
        id: get_str(payload, "content_id")?,
        title: get_str(payload, "title"),
        url: get_str(payload, "url")?,
        description: get_str(payload, "description"),
        thumbnail: get_str(payload, "thumbnail"),
        category: ContentCategory::from_i64(get_i64(payload, "content_category_id")?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_uuid_is_deterministic_and_distinct() {
        assert_eq!(stable_uuid("v1"), stable_uuid("v1"));
        assert_ne!(stable_uuid("v1"), stable_uuid("v2"));
    }

    #[test]
    fn payload_roundtrip_preserves_display_fields() {
        let mut payload: HashMap<String, QValue> = HashMap::new();
        payload.insert("content_id".into(), qstring("v1"));
        payload.insert("url".into(), qstring("https://youtube.com/watch?v=v1"));
        payload.insert("title".into(), qstring("T"));
        payload.insert(
            "content_category_id".into(),
            QValue {
                kind: Some(value::Kind::IntegerValue(1)),
            },
        );

        let item = payload_to_item(&payload).unwrap();
        assert_eq!(item.id, "v1");
        assert_eq!(item.category, ContentCategory::Video);
        assert!(item.description.is_none());
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let mut payload: HashMap<String, QValue> = HashMap::new();
        payload.insert("content_id".into(), qstring("v1"));
        // No url, no category.
        assert!(payload_to_item(&payload).is_none());
    }
}
