//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings; UUIDs are hyphenated lowercase strings;
//! statuses are their lowercase names.

use amity_core::{
  friendship::{FriendDetail, FriendRow, Friendship, FriendshipStatus},
  user::User,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── FriendshipStatus ─────────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<FriendshipStatus> { Ok(s.parse()?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub id:           String,
  pub full_name:    String,
  pub phone_number: String,
  pub created_at:   String,
}

impl RawUser {
  /// Read the four user columns starting at `offset`.
  pub fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(offset)?,
      full_name:    row.get(offset + 1)?,
      phone_number: row.get(offset + 2)?,
      created_at:   row.get(offset + 3)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:           decode_uuid(&self.id)?,
      full_name:    self.full_name,
      phone_number: self.phone_number,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `friendships` row.
pub struct RawFriendship {
  pub user_id:        String,
  pub friend_user_id: String,
  pub status:         String,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawFriendship {
  pub fn into_friendship(self) -> Result<Friendship> {
    Ok(Friendship {
      user_id:        decode_uuid(&self.user_id)?,
      friend_user_id: decode_uuid(&self.friend_user_id)?,
      status:         decode_status(&self.status)?,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// A user row followed by the total-friend-count column and, for the batched
/// listing, the mutual-friend-count column.
pub struct RawFriendRow {
  pub user:                RawUser,
  pub total_friend_count:  i64,
  pub mutual_friend_count: Option<i64>,
}

impl RawFriendRow {
  pub fn into_detail(self) -> Result<FriendDetail> {
    Ok(FriendDetail {
      user:               self.user.into_user()?,
      total_friend_count: self.total_friend_count,
    })
  }

  pub fn into_row(self) -> Result<FriendRow> {
    let mutual_friend_count = self.mutual_friend_count.unwrap_or(0);
    Ok(FriendRow { detail: self.into_detail()?, mutual_friend_count })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dt_round_trip_keeps_utc() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }

  #[test]
  fn bad_dt_is_a_date_parse_error() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }

  #[test]
  fn bad_status_surfaces_core_error() {
    assert!(matches!(
      decode_status("pending"),
      Err(Error::Core(amity_core::Error::UnknownStatus(_)))
    ));
  }
}
