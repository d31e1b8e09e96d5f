//! POST /create_embeddings — operator-facing sync trigger.
//!
//! Runs the requested sources through the dedup & sync engine. The
//! response carries a per-source report; per-item failures are counted
//! there, not surfaced as HTTP errors.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use rec_store::sync::{SyncOptions, sync};
use rec_store::{ContentCategory, SyncReport};

use crate::core::app_state::AppState;
use crate::error_handler::AppResult;

#[derive(Debug, Deserialize)]
pub struct CreateEmbeddingsRequest {
    #[serde(default)]
    pub youtube: bool,
    #[serde(default)]
    pub blog: bool,
    /// Re-embed and overwrite items that already exist.
    #[serde(default)]
    pub force_refresh: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateEmbeddingsResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<SyncReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<SyncReport>,
}

/// Handler: POST /create_embeddings
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/create_embeddings \
///   -H 'content-type: application/json' \
///   -d '{"youtube":true,"blog":true,"force_refresh":false}'
/// ```
pub async fn create_embeddings(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateEmbeddingsRequest>,
) -> AppResult<Json<CreateEmbeddingsResponse>> {
    let opts = SyncOptions {
        force_refresh: body.force_refresh,
        ..state.sync_opts
    };

    let mut response = CreateEmbeddingsResponse {
        status: "success",
        youtube: None,
        blog: None,
    };

    if body.youtube {
        let report = sync(
            &state.youtube,
            ContentCategory::Video,
            state.store.as_ref(),
            state.embedder.as_ref(),
            &opts,
        )
        .await?;
        response.youtube = Some(report);
    }

    if body.blog {
        let report = sync(
            &state.blog,
            ContentCategory::Blog,
            state.store.as_ref(),
            state.embedder.as_ref(),
            &opts,
        )
        .await?;
        response.blog = Some(report);
    }

    Ok(Json(response))
}
