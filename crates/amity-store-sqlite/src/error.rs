//! Error type for `amity-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] amity_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl amity_core::DomainError for Error {
  fn domain(&self) -> Option<&amity_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}
