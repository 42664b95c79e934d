//! Error types for `amity-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("no pending friendship request from {from} to {to}")]
  RequestNotFound { from: Uuid, to: Uuid },

  #[error("{user} and {friend} are already friends")]
  AlreadyFriends { user: Uuid, friend: Uuid },

  #[error("a user cannot befriend themselves: {0}")]
  SelfFriendship(Uuid),

  #[error("unknown friendship status: {0:?}")]
  UnknownStatus(String),

  #[error("invalid {field}: {value}")]
  InvalidCount { field: &'static str, value: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Lets callers recognise a domain failure inside a backend's error type, so
/// it can be reported as such rather than as an opaque storage error.
pub trait DomainError {
  fn domain(&self) -> Option<&Error>;
}

impl DomainError for Error {
  fn domain(&self) -> Option<&Error> { Some(self) }
}

impl DomainError for std::convert::Infallible {
  fn domain(&self) -> Option<&Error> { match *self {} }
}
