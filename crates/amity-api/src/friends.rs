//! Handlers for `/friends` endpoints — the friend-list queries.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/friends` | All accepted friends with counts |
//! | `GET`  | `/friends/{id}` | One friend; 404 unless the friendship is accepted |
//! | `POST` | `/friends/by-id` | Same as above, id in body `{"friendUserId":"..."}` |

use amity_core::{friendship::FriendInfo, store::FriendshipStore};
use axum::{
  Json,
  extract::{Path, State},
};
use uuid::Uuid;

use crate::{
  AppState, error::ApiError, friendships::FriendUserBody, requester::Requester,
};

/// `GET /friends`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Requester(requester_id): Requester,
) -> Result<Json<Vec<FriendInfo>>, ApiError>
where
  S: FriendshipStore,
{
  Ok(Json(state.friends.get_all_friends(requester_id).await?))
}

/// `GET /friends/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Requester(requester_id): Requester,
  Path(friend_user_id): Path<Uuid>,
) -> Result<Json<FriendInfo>, ApiError>
where
  S: FriendshipStore,
{
  Ok(Json(
    state
      .friends
      .get_friend_by_id(requester_id, friend_user_id)
      .await?,
  ))
}

/// `POST /friends/by-id`
pub async fn get_by_id<S>(
  State(state): State<AppState<S>>,
  Requester(requester_id): Requester,
  Json(body): Json<FriendUserBody>,
) -> Result<Json<FriendInfo>, ApiError>
where
  S: FriendshipStore,
{
  Ok(Json(
    state
      .friends
      .get_friend_by_id(requester_id, body.friend_user_id)
      .await?,
  ))
}
