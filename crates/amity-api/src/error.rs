//! API error type and [`axum::response::IntoResponse`] implementation.

use amity_core::{DomainError, service::QueryError};
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

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error: domain failures keep their meaning, anything
  /// else is an internal storage error.
  pub fn from_store<E>(e: E) -> Self
  where
    E: std::error::Error + DomainError + Send + Sync + 'static,
  {
    use amity_core::Error as Domain;

    let message = e.to_string();
    let classified = match e.domain() {
      Some(Domain::UserNotFound(_) | Domain::RequestNotFound { .. }) => {
        Some(ApiError::NotFound(message))
      }
      Some(Domain::AlreadyFriends { .. }) => Some(ApiError::Conflict(message)),
      Some(Domain::InvalidInput(_) | Domain::SelfFriendship(_)) => {
        Some(ApiError::BadRequest(message))
      }
      Some(Domain::UnknownStatus(_) | Domain::InvalidCount { .. }) | None => None,
    };
    classified.unwrap_or_else(|| ApiError::Store(Box::new(e)))
  }
}

impl<E> From<QueryError<E>> for ApiError
where
  E: std::error::Error + DomainError + Send + Sync + 'static,
{
  fn from(e: QueryError<E>) -> Self {
    match e {
      QueryError::NotFound { .. } => ApiError::NotFound(e.to_string()),
      QueryError::BadRequest(m) => ApiError::BadRequest(m),
      QueryError::Store(inner) => ApiError::from_store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
