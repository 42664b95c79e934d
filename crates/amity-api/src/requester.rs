//! Extractor for the authenticated caller.
//!
//! Authentication happens upstream (gateway or session middleware), which
//! forwards the caller's id in the `X-User-Id` header. This layer trusts that
//! header and only checks that it is a well-formed UUID.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the already-authenticated caller's id.
pub const REQUESTER_HEADER: &str = "x-user-id";

/// The id of the user on whose behalf the request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester(pub Uuid);

impl<St> FromRequestParts<St> for Requester
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &St,
  ) -> Result<Self, Self::Rejection> {
    let value = parts
      .headers
      .get(REQUESTER_HEADER)
      .ok_or_else(|| ApiError::Unauthorized(format!("missing {REQUESTER_HEADER} header")))?;

    value
      .to_str()
      .ok()
      .and_then(|s| Uuid::parse_str(s.trim()).ok())
      .map(Requester)
      .ok_or_else(|| ApiError::Unauthorized(format!("malformed {REQUESTER_HEADER} header")))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::Request;

  use super::*;

  async fn extract(req: Request<()>) -> Result<Requester, ApiError> {
    let (mut parts, _) = req.into_parts();
    Requester::from_request_parts(&mut parts, &()).await
  }

  #[tokio::test]
  async fn valid_header() {
    let id = Uuid::new_v4();
    let req = Request::builder()
      .header(REQUESTER_HEADER, id.to_string())
      .body(())
      .unwrap();
    assert_eq!(extract(req).await.unwrap(), Requester(id));
  }

  #[tokio::test]
  async fn missing_header() {
    let req = Request::builder().body(()).unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized(_))));
  }

  #[tokio::test]
  async fn malformed_header() {
    let req = Request::builder()
      .header(REQUESTER_HEADER, "not-a-uuid")
      .body(())
      .unwrap();
    assert!(matches!(extract(req).await, Err(ApiError::Unauthorized(_))));
  }
}
