//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};
use thiserror::Error;

use quizforge_core::error::StoreError;

/// An error returned by a handler.
///
/// Variants differ in status code and in the JSON key carrying the message
/// (`msg` or `error`), which clients rely on.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 `{msg}`.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// 400 `{msg}`.
    #[error("{0}")]
    BadRequest(String),

    /// 400 `{error}`.
    #[error("{0}")]
    InvalidInput(String),

    /// 404 `{error}`.
    #[error("{0}")]
    NotFound(String),

    /// 404 `{msg}`; the resource is missing or belongs to someone else.
    #[error("{0}")]
    NotOwned(String),

    /// 500 `{msg}`; the model provider failed.
    #[error("{0}")]
    Upstream(String),

    /// 500 `{error}`.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::NotOwned(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn key(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_)
            | ApiError::BadRequest(_)
            | ApiError::NotOwned(_)
            | ApiError::Upstream(_) => "msg",
            ApiError::InvalidInput(_) | ApiError::NotFound(_) | ApiError::Internal(_) => "error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert(self.key().into(), Value::String(self.to_string()));
        (self.status(), Json(Value::Object(body))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail(_) => ApiError::BadRequest("User already exists".into()),
            other => {
                tracing::error!("store failure: {other}");
                ApiError::Internal("Server error".into())
            }
        }
    }
}
