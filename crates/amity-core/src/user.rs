//! User — the vertex of the friendship graph.
//!
//! Users are registered once and never modified afterwards. Everything this
//! crate computes about a user (friend counts, mutual friends) is derived at
//! query time from the friendship edges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:           Uuid,
  pub full_name:    String,
  pub phone_number: String,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::FriendshipStore::add_user`].
///
/// Built through [`NewUser::new`], which trims and rejects empty fields, so a
/// value of this type is always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
  full_name:    String,
  phone_number: String,
}

impl NewUser {
  pub fn new(
    full_name: impl Into<String>,
    phone_number: impl Into<String>,
  ) -> Result<Self> {
    Ok(Self {
      full_name:    non_empty("fullName", full_name.into())?,
      phone_number: non_empty("phoneNumber", phone_number.into())?,
    })
  }

  pub fn full_name(&self) -> &str { &self.full_name }

  pub fn phone_number(&self) -> &str { &self.phone_number }
}

fn non_empty(field: &str, value: String) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::InvalidInput(format!("{field} must not be empty")));
  }
  Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_user_trims_fields() {
    let user = NewUser::new("  Ada Lovelace ", "\t+44 20 7946 0000\n").unwrap();
    assert_eq!(user.full_name(), "Ada Lovelace");
    assert_eq!(user.phone_number(), "+44 20 7946 0000");
  }

  #[test]
  fn new_user_rejects_blank_name() {
    let err = NewUser::new("   ", "555-0100").unwrap_err();
    assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("fullName")));
  }

  #[test]
  fn new_user_rejects_empty_phone() {
    let err = NewUser::new("Ada", "").unwrap_err();
    assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("phoneNumber")));
  }

  #[test]
  fn user_serialises_camel_case() {
    let user = User {
      id:           Uuid::nil(),
      full_name:    "Ada".into(),
      phone_number: "555-0100".into(),
      created_at:   Utc::now(),
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["fullName"], "Ada");
    assert_eq!(json["phoneNumber"], "555-0100");
    assert!(json.get("createdAt").is_some());
  }
}
