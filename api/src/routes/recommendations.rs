//! GET /recommendations — ranked similarity results for a query string.

use std::sync::Arc;

use axum::{Json, extract::Query, extract::State};
use serde::{Deserialize, Serialize};

use rec_store::QueryResult;
use rec_store::recommend::recommend;

use crate::core::app_state::AppState;
use crate::error_handler::AppResult;

#[derive(Debug, Deserialize)]
pub struct RecommendationsParams {
    /// Free-text query; defaults to "Programming".
    pub user_query: Option<String>,
    /// Result count; defaults to the configured k.
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub data: Vec<QueryResult>,
}

/// Handler: GET /recommendations
///
/// # Example
/// ```bash
/// curl 'http://127.0.0.1:8000/recommendations?user_query=rust+ownership&k=5'
/// ```
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecommendationsParams>,
) -> AppResult<Json<RecommendationsResponse>> {
    let query = params
        .user_query
        .unwrap_or_else(|| "Programming".to_string());
    let k = params.k.unwrap_or(0);

    let data = recommend(
        &query,
        k,
        state.store.as_ref(),
        state.embedder.as_ref(),
        &state.recommend_cfg,
    )
    .await?;

    Ok(Json(RecommendationsResponse { data }))
}
