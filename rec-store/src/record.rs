//! Core data models used by the library.

use serde::{Serialize, Serializer};

/// Content category, stored as an integer discriminant.
///
/// Thumbnails are only meaningful for [`ContentCategory::Video`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentCategory {
    Video = 1,
    Blog = 2,
}

impl ContentCategory {
    /// Integer discriminant as persisted in the store.
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Parses a persisted discriminant back into a category.
    pub fn from_i64(v: i64) -> Option<Self> {
        match v {
            1 => Some(ContentCategory::Video),
            2 => Some(ContentCategory::Blog),
            _ => None,
        }
    }
}

impl Serialize for ContentCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

/// A content item as listed by a source adapter, before embedding.
#[derive(Clone, Debug)]
pub struct SourceItem {
    /// Stable key: video id, or URL-derived slug.
    pub id: String,
    /// Display title. `None` is tolerated but flagged as a data-quality
    /// warning by the adapter.
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    /// Canonical, user-facing link. Mandatory.
    pub url: String,
    /// The text that gets embedded. Raw document body for blogs,
    /// concatenated title+description for videos.
    pub source_text: String,
}

/// The unit of persistence: a source item plus its embedding.
///
/// Never partially written — a record becomes visible in the store only
/// after embedding succeeded.
#[derive(Clone, Debug)]
pub struct ContentItem {
    pub id: String,
    pub title: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub category: ContentCategory,
    pub source_text: String,
    pub embedding: Vec<f32>,
}

impl ContentItem {
    /// Builds a persistable item from a source item and its vector.
    pub fn from_source(item: SourceItem, category: ContentCategory, embedding: Vec<f32>) -> Self {
        Self {
            id: item.id,
            title: item.title,
            url: item.url,
            description: item.description,
            thumbnail: item.thumbnail,
            category,
            source_text: item.source_text,
            embedding,
        }
    }
}

/// Metadata projection returned by similarity search (no vector).
#[derive(Clone, Debug)]
pub struct StoredItem {
    pub id: String,
    pub title: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub category: ContentCategory,
}

/// A single ranked recommendation. Ephemeral, never persisted.
///
/// `score` is cosine similarity on the 1-is-best scale
/// (`1 − cosine_distance`); it can be negative for opposite vectors.
#[derive(Clone, Debug, Serialize)]
pub struct QueryResult {
    pub title: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(rename = "content_category_id")]
    pub category: ContentCategory,
    pub score: f32,
}

/// Aggregate counts for one sync run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_roundtrips_through_discriminant() {
        assert_eq!(ContentCategory::Video.as_i64(), 1);
        assert_eq!(ContentCategory::Blog.as_i64(), 2);
        assert_eq!(
            ContentCategory::from_i64(2),
            Some(ContentCategory::Blog)
        );
        assert_eq!(ContentCategory::from_i64(7), None);
    }

    #[test]
    fn query_result_serializes_category_as_integer() {
        let r = QueryResult {
            title: Some("t".into()),
            url: "https://example.com".into(),
            description: None,
            thumbnail: None,
            category: ContentCategory::Video,
            score: 0.5,
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["content_category_id"], 1);
    }
}
