//! JSON REST API for Amity.
//!
//! Exposes an axum [`Router`] backed by any [`amity_core::store::FriendshipStore`].
//! Authentication, TLS, and transport concerns are the caller's
//! responsibility; friendship routes only read the caller's id from the
//! [`requester::REQUESTER_HEADER`] header.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", amity_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod friends;
pub mod friendships;
pub mod requester;
pub mod users;

use std::sync::Arc;

use amity_core::{service::FriendshipQueryService, store::FriendshipStore};
use axum::{
  Router,
  routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:   Arc<S>,
  pub friends: FriendshipQueryService<S>,
}

impl<S: FriendshipStore> AppState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      friends: FriendshipQueryService::new(Arc::clone(&store)),
      store,
    }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   Arc::clone(&self.store),
      friends: self.friends.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FriendshipStore + 'static,
{
  Router::new()
    // Users
    .route("/users", post(users::create::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    // Friendship requests
    .route("/friendships/requests", post(friendships::send::<S>))
    .route("/friendships/requests/accept", post(friendships::accept::<S>))
    .route("/friendships/requests/decline", post(friendships::decline::<S>))
    .route("/friendships/requests/outgoing", get(friendships::outgoing::<S>))
    // Friend lists
    .route("/friends", get(friends::list::<S>))
    .route("/friends/by-id", post(friends::get_by_id::<S>))
    .route("/friends/{id}", get(friends::get_one::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(AppState::new(store))
}
