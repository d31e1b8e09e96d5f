use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rec_store::RecError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::MissingEnv(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            // custom mapped
            AppError::Http { status, .. } => *status,

            // 5xx
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Converts core errors to `AppError::Http` with precise HTTP status & code.
///
/// Query validation is the caller's fault (4xx); provider and source
/// failures are upstream trouble (502); store failures are ours (500).
impl From<RecError> for AppError {
    fn from(err: RecError) -> Self {
        let message = err.to_string();
        let (status, code) = match &err {
            RecError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "INVALID_QUERY"),
            RecError::ProviderLimitExceeded { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "PROVIDER_LIMIT_EXCEEDED")
            }
            RecError::Provider(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            RecError::SourceFetch(_) => (StatusCode::BAD_GATEWAY, "SOURCE_FETCH_ERROR"),
            RecError::StoreWrite(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_WRITE_ERROR"),
            RecError::StoreRead(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_READ_ERROR"),
            RecError::VectorSizeMismatch { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "VECTOR_SIZE_MISMATCH")
            }
            RecError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            RecError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };
        AppError::Http {
            status,
            code,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_query_maps_to_bad_request() {
        let app: AppError = RecError::InvalidQuery("empty".into()).into();
        assert_eq!(app.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(app.error_code(), "INVALID_QUERY");
    }

    #[test]
    fn source_fetch_maps_to_bad_gateway() {
        let app: AppError = RecError::SourceFetch("down".into()).into();
        assert_eq!(app.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(app.error_code(), "SOURCE_FETCH_ERROR");
    }

    #[test]
    fn store_errors_stay_internal() {
        let app: AppError = RecError::StoreWrite("constraint".into()).into();
        assert_eq!(app.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
