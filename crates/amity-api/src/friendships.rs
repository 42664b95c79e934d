//! Handlers for `/friendships/requests` endpoints.
//!
//! Every route acts on behalf of the [`Requester`].
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/friendships/requests` | Body: `{"friendUserId":"..."}`; returns 201 + edge |
//! | `POST` | `/friendships/requests/accept` | Accept the request *from* `friendUserId`; 204 |
//! | `POST` | `/friendships/requests/decline` | Decline the request *from* `friendUserId`; 204 |
//! | `GET`  | `/friendships/requests/outgoing` | Every edge the requester owns |

use amity_core::{friendship::Friendship, store::FriendshipStore};
use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, requester::Requester};

/// JSON body naming the other party of a friendship.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendUserBody {
  pub friend_user_id: Uuid,
}

/// `POST /friendships/requests`
pub async fn send<S>(
  State(state): State<AppState<S>>,
  Requester(user_id): Requester,
  Json(body): Json<FriendUserBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FriendshipStore,
{
  let edge = state
    .store
    .send_request(user_id, body.friend_user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(edge)))
}

/// `POST /friendships/requests/accept`
pub async fn accept<S>(
  State(state): State<AppState<S>>,
  Requester(user_id): Requester,
  Json(body): Json<FriendUserBody>,
) -> Result<StatusCode, ApiError>
where
  S: FriendshipStore,
{
  state
    .store
    .accept_request(user_id, body.friend_user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /friendships/requests/decline`
pub async fn decline<S>(
  State(state): State<AppState<S>>,
  Requester(user_id): Requester,
  Json(body): Json<FriendUserBody>,
) -> Result<StatusCode, ApiError>
where
  S: FriendshipStore,
{
  state
    .store
    .decline_request(user_id, body.friend_user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /friendships/requests/outgoing`
pub async fn outgoing<S>(
  State(state): State<AppState<S>>,
  Requester(user_id): Requester,
) -> Result<Json<Vec<Friendship>>, ApiError>
where
  S: FriendshipStore,
{
  let edges = state
    .store
    .outgoing_requests(user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(edges))
}
