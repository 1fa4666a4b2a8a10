//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The filters matched nothing. Rendered as a warning, not a failure.
  #[error("{0}")]
  Empty(String),

  #[error("data source error: {0}")]
  Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<trialwatch_core::Error> for ApiError {
  fn from(e: trialwatch_core::Error) -> Self {
    match e {
      trialwatch_core::Error::EmptySelection(_) => ApiError::Empty(e.to_string()),
      trialwatch_core::Error::NotInSelection { .. } => ApiError::NotFound(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Empty(m) => (StatusCode::NOT_FOUND, json!({ "warning": m })),
      ApiError::Source(e) => {
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
