//! GET /health_check — liveness probe.

use axum::http::StatusCode;

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
