//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind a minimal API,
//! hiding away the verbose builder pattern and keeping the rest of the
//! crate decoupled from `qdrant-client`.

use crate::config::StoreConfig;
use crate::errors::RecError;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, GetPointsBuilder, PointId, PointStruct, RetrievedPoint,
    ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value as QValue,
    VectorParamsBuilder,
};
use tracing::{debug, info, warn};

/// A facade over the Qdrant client to keep the rest of the code clean
/// and stable.
pub(crate) struct QdrantFacade {
    client: Qdrant,
    collection: String,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Uses the builder-based API of `qdrant-client` and supports
    /// optional API key authentication.
    pub fn new(cfg: &StoreConfig) -> Result<Self, RecError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RecError::Config(format!("qdrant client: {e}")))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
        })
    }

    /// Ensures that the collection exists, creating it with a cosine
    /// vector space when missing.
    pub async fn ensure_collection(&self, dim: usize) -> Result<(), RecError> {
        info!(
            "Ensuring collection '{}' with size={} distance=Cosine",
            self.collection, dim
        );

        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!("Collection '{}' already exists", self.collection);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "Collection '{}' not found, will be created (error={})",
                    self.collection, err
                );
            }
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dim as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| RecError::StoreWrite(e.to_string()))?;

        info!("Collection '{}' created successfully", self.collection);
        Ok(())
    }

    /// Upserts (inserts or fully replaces) a batch of points.
    pub async fn upsert_points(&self, points: Vec<PointStruct>) -> Result<(), RecError> {
        if points.is_empty() {
            debug!("No points provided for upsert");
            return Ok(());
        }

        debug!(
            "Upserting {} points into collection '{}'",
            points.len(),
            self.collection
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| RecError::StoreWrite(e.to_string()))?;

        Ok(())
    }

    /// Whether a point with the given id exists.
    pub async fn has_point(&self, id: impl Into<PointId>) -> Result<bool, RecError> {
        let res = self
            .client
            .get_points(
                GetPointsBuilder::new(&self.collection, vec![id.into()])
                    .with_payload(false)
                    .with_vectors(false),
            )
            .await
            .map_err(|e| RecError::StoreRead(e.to_string()))?;
        Ok(!res.result.is_empty())
    }

    /// Scrolls the whole collection, returning every stored payload.
    ///
    /// Used once per sync run to load the existing-key set.
    pub async fn scroll_payloads(&self) -> Result<Vec<RetrievedPoint>, RecError> {
        let mut out = Vec::new();
        let mut offset: Option<PointId> = None;

        loop {
            let mut builder = ScrollPointsBuilder::new(&self.collection)
                .limit(256)
                .with_payload(true)
                .with_vectors(false);
            if let Some(o) = offset.take() {
                builder = builder.offset(o);
            }

            let res = self
                .client
                .scroll(builder)
                .await
                .map_err(|e| RecError::StoreRead(e.to_string()))?;

            out.extend(res.result);

            match res.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!("scroll_payloads -> {} points", out.len());
        Ok(out)
    }

    /// Performs a similarity search.
    ///
    /// Returns `(score, payload)` tuples sorted by score. With a cosine
    /// collection Qdrant's score is already `1 − cosine_distance`.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<(f32, std::collections::HashMap<String, QValue>)>, RecError> {
        debug!(
            "Searching in '{}' with top_k={}",
            self.collection, top_k
        );

        let builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RecError::StoreRead(e.to_string()))?;

        Ok(res
            .result
            .into_iter()
            .map(|r| (r.score, r.payload))
            .collect())
    }
}
