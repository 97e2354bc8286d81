//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use ngo_core::ErrorKind;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// An error returned by an API handler.
///
/// Only the short message crosses the API boundary; storage details are
/// logged and replaced with a generic message.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("internal server error")]
  Internal,
}

impl From<ngo_core::Error> for ApiError {
  fn from(err: ngo_core::Error) -> Self {
    let message = err.to_string();
    match err.kind() {
      ErrorKind::Validation | ErrorKind::Conflict => {
        warn!(error = %message, "request rejected");
        Self::BadRequest(message)
      }
      ErrorKind::NotFound => {
        warn!(error = %message, "record not found");
        Self::NotFound(message)
      }
      ErrorKind::Internal => {
        error!(error = %message, "storage failure");
        Self::Internal
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match self {
      ApiError::BadRequest(m) | ApiError::NotFound(m) => m,
      ApiError::Internal => "internal server error".to_owned(),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
