//! Dedup & sync engine: source listing → skip/force decision → embedding
//! → upsert.
//!
//! One item's failure never aborts the run; provider and store errors are
//! counted per item and reported in the [`SyncReport`]. Re-running a sync
//! with `force_refresh=false` and unchanged source data adds nothing.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::embed::EmbeddingsProvider;
use crate::errors::RecError;
use crate::record::{ContentCategory, ContentItem, SourceItem, SyncReport};
use crate::sources::ContentSource;
use crate::store::VectorStore;

/// Per-run knobs.
#[derive(Clone, Copy, Debug)]
pub struct SyncOptions {
    /// Re-embed and overwrite items that already exist in the store.
    pub force_refresh: bool,
    /// Maximum number of concurrent embedding calls.
    pub embed_concurrency: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force_refresh: false,
            embed_concurrency: 4,
        }
    }
}

/// Synchronizes one source into the store.
///
/// Existing keys are loaded once per run (global identifier namespace);
/// items already present are skipped unless `force_refresh` is set.
/// Fatal errors are only those that prevent the run from starting at all
/// (source unreachable, store key listing failed).
pub async fn sync(
    source: &dyn ContentSource,
    category: ContentCategory,
    store: &dyn VectorStore,
    embedder: &dyn EmbeddingsProvider,
    opts: &SyncOptions,
) -> Result<SyncReport, RecError> {
    info!(
        source = source.name(),
        force_refresh = opts.force_refresh,
        "sync started"
    );

    let items = source.fetch().await?;
    let existing = store.existing_keys().await?;
    debug!(
        source = source.name(),
        listed = items.len(),
        existing = existing.len(),
        "source listed"
    );

    let mut report = SyncReport::default();
    let mut pending: Vec<SourceItem> = Vec::new();

    for item in items {
        if existing.contains(&item.id) && !opts.force_refresh {
            debug!(id = %item.id, "already embedded, skipping");
            report.skipped += 1;
        } else {
            pending.push(item);
        }
    }

    // Embed with bounded concurrency; indexes restore source order so
    // upserts stay deterministic.
    let mut embedded: Vec<(usize, SourceItem, Result<Vec<f32>, RecError>)> =
        stream::iter(pending.into_iter().enumerate())
            .map(|(i, item)| async move {
                let vector = embedder.embed(&item.source_text).await;
                (i, item, vector)
            })
            .buffer_unordered(opts.embed_concurrency.max(1))
            .collect()
            .await;
    embedded.sort_by_key(|(i, _, _)| *i);

    for (_, item, vector) in embedded {
        let id = item.id.clone();
        let vector = match vector {
            Ok(v) => v,
            Err(e) => {
                warn!(id = %id, error = %e, "embedding failed, item counted as failed");
                report.failed += 1;
                continue;
            }
        };

        let record = ContentItem::from_source(item, category, vector);
        match store.upsert(&record).await {
            Ok(()) => report.added += 1,
            Err(e) => {
                warn!(id = %id, error = %e, "store write failed, item counted as failed");
                report.failed += 1;
            }
        }
    }

    info!(
        source = source.name(),
        added = report.added,
        skipped = report.skipped,
        failed = report.failed,
        "sync finished"
    );
    Ok(report)
}
