//! REST API endpoints.
//!
//! Axum-based HTTP API exposing playlist watch-time estimates.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::fetch::{ErrorKind, PlaylistError};
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Playlist(err) => {
                let kind = err.kind();
                let status = match kind {
                    ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::EmptyResult => StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorKind::Auth | ErrorKind::Upstream | ErrorKind::Unexpected => {
                        StatusCode::BAD_GATEWAY
                    }
                };
                (status, kind.as_str())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        "*" => layer.allow_origin(Any),
        other => match HeaderValue::from_str(other) {
            Ok(value) => layer.allow_origin(value),
            Err(_) => {
                tracing::warn!("Invalid CORS origin {:?}, allowing any", other);
                layer.allow_origin(Any)
            }
        },
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/estimate", get(routes::estimate::estimate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: PlaylistError) -> StatusCode {
        ApiError::from(err).status_and_code().0
    }

    #[test]
    fn test_playlist_error_statuses() {
        assert_eq!(status_of(PlaylistError::Config), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            status_of(PlaylistError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(PlaylistError::Auth), StatusCode::BAD_GATEWAY);
        assert_eq!(status_of(PlaylistError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(PlaylistError::EmptyResult),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(PlaylistError::Upstream("quota".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(PlaylistError::Unexpected("reset".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_codes() {
        let (_, code) = ApiError::from(PlaylistError::NotFound).status_and_code();
        assert_eq!(code, "NOT_FOUND");

        let (_, code) = ApiError::BadRequest("nope".into()).status_and_code();
        assert_eq!(code, "BAD_REQUEST");
    }

    #[test]
    fn test_error_message_passthrough() {
        let err = ApiError::from(PlaylistError::Upstream("Daily limit exceeded".into()));
        assert_eq!(err.to_string(), "Daily limit exceeded");
    }
}
