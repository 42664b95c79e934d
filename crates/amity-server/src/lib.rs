//! Server wiring for Amity: configuration loading and store opening.
//!
//! The binary in `main.rs` is a thin shell around these functions so they can
//! be tested without binding a socket.

use std::path::{Path, PathBuf};

use amity_store_sqlite::SqliteStore;
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `AMITY_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file; `:memory:` keeps everything in RAM.
  pub store_path: PathBuf,
}

impl ServerConfig {
  /// Load from `path` (optional) layered under the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::from_source(config::File::from(path).required(false))
  }

  fn from_source<T>(file: T) -> Result<Self, config::ConfigError>
  where
    T: config::Source + Send + Sync + 'static,
  {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 3000)?
      .set_default("store_path", "amity.db")?
      .add_source(file)
      .add_source(config::Environment::with_prefix("AMITY"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Open the configured store, expanding a leading `~`.
pub async fn open_store(
  config: &ServerConfig,
) -> amity_store_sqlite::Result<SqliteStore> {
  if config.store_path.as_os_str() == ":memory:" {
    return SqliteStore::open_in_memory().await;
  }
  SqliteStore::open(expand_tilde(&config.store_path)).await
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
