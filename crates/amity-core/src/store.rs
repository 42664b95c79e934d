//! The `FriendshipStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `amity-store-sqlite`).
//! [`crate::service::FriendshipQueryService`] and the HTTP layer depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  DomainError,
  friendship::{FriendDetail, FriendRow, Friendship},
  user::{NewUser, User},
};

/// Abstraction over a friendship-graph storage backend.
///
/// Every friend-list read counts only `accepted` edges: candidate selection,
/// detail enrichment, and both aggregates. Mutations keep at most one edge per
/// ordered pair by upserting.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FriendshipStore: Send + Sync {
  type Error: std::error::Error + DomainError + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register and persist a new user.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  // ── Edge mutations ────────────────────────────────────────────────────

  /// Upsert the `(user_id, friend_user_id)` edge to `requested`.
  ///
  /// Fails if the target does not exist, if the two ids are equal, or if the
  /// edge is already `accepted`.
  fn send_request(
    &self,
    user_id: Uuid,
    friend_user_id: Uuid,
  ) -> impl Future<Output = Result<Friendship, Self::Error>> + Send + '_;

  /// Accept the pending `(friend_user_id, user_id)` request: mark it
  /// `accepted` and upsert the reverse `(user_id, friend_user_id)` edge as
  /// `accepted`, in one transaction.
  fn accept_request(
    &self,
    user_id: Uuid,
    friend_user_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Decline the pending `(friend_user_id, user_id)` request.
  fn decline_request(
    &self,
    user_id: Uuid,
    friend_user_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Every edge owned by `user_id`, whatever its status.
  fn outgoing_requests(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Friendship>, Self::Error>> + Send + '_;

  // ── Friend-graph reads ────────────────────────────────────────────────

  /// Ids of every user `requester_id` has an accepted edge to.
  fn friend_ids(
    &self,
    requester_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  /// The friend's user record and total friend count, restricted to an
  /// accepted `(requester_id, friend_user_id)` edge. `None` if there is none.
  fn friend_detail(
    &self,
    requester_id: Uuid,
    friend_user_id: Uuid,
  ) -> impl Future<Output = Result<Option<FriendDetail>, Self::Error>> + Send + '_;

  /// Number of distinct third users both parties have accepted edges to.
  fn mutual_friend_count(
    &self,
    requester_id: Uuid,
    friend_user_id: Uuid,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Detail and both counts for every accepted friend of `requester_id`, in a
  /// single round trip. Each row equals what `friend_detail` and
  /// `mutual_friend_count` return for that friend.
  fn list_friends(
    &self,
    requester_id: Uuid,
  ) -> impl Future<Output = Result<Vec<FriendRow>, Self::Error>> + Send + '_;

  /// `(user_id, total_friend_count)` for every user with at least one
  /// accepted outgoing edge.
  fn total_friend_counts(
    &self,
  ) -> impl Future<Output = Result<Vec<(Uuid, i64)>, Self::Error>> + Send + '_;
}
