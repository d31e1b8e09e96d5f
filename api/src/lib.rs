//! HTTP surface for the recommendation backend.
//!
//! Two operations: a recommendation query and an operator-facing sync
//! trigger. All shared handles live in [`core::app_state::AppState`],
//! built once at startup — no process-wide singletons.

use std::env;
use std::sync::Arc;

mod core;
mod error_handler;
mod routes;

pub use error_handler::AppError;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;

use crate::core::app_state::AppState;
use crate::routes::{
    create_embeddings::create_embeddings, health_check::health_check,
    recommendations::get_recommendations,
};

pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;

    let state = Arc::new(AppState::from_env().await?);

    let app = Router::new()
        .route("/health_check", get(health_check))
        .route("/recommendations", get(get_recommendations))
        .route("/create_embeddings", post(create_embeddings))
        .with_state(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    tracing::info!("listening on {host_url}");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    // Wait for the Ctrl+C signal
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
