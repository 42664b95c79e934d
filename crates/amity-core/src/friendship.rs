//! Friendship edges and the derived friend views.
//!
//! A friendship between X and Y is two directed edges, `(X, Y)` and `(Y, X)`,
//! each owned by its first user. At most one edge exists per ordered pair; a
//! missing row is the initial state of every pair.
//!
//! ```text
//! none ──request──▶ requested ──accept──▶ accepted
//!                       │  ▲
//!                 decline  re-request
//!                       ▼  │
//!                     declined
//! ```

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, user::User};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The state of one directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
  Requested,
  Accepted,
  Declined,
}

impl FriendshipStatus {
  /// The string stored in the `status` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Requested => "requested",
      Self::Accepted => "accepted",
      Self::Declined => "declined",
    }
  }
}

impl fmt::Display for FriendshipStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for FriendshipStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "requested" => Ok(Self::Requested),
      "accepted" => Ok(Self::Accepted),
      "declined" => Ok(Self::Declined),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

// ─── Transitions ─────────────────────────────────────────────────────────────

/// Check that `owner` may (re-)send a request to `friend`, given the current
/// status of the `(owner, friend)` edge.
///
/// A missing, pending or declined edge may be (re-)requested. An accepted edge
/// may not.
pub fn check_request(
  owner: Uuid,
  friend: Uuid,
  existing: Option<FriendshipStatus>,
) -> Result<()> {
  if owner == friend {
    return Err(Error::SelfFriendship(owner));
  }
  match existing {
    Some(FriendshipStatus::Accepted) => {
      Err(Error::AlreadyFriends { user: owner, friend })
    }
    _ => Ok(()),
  }
}

/// Check that the `(from, to)` edge is pending, so that `to` may accept or
/// decline it.
pub fn check_response(
  from: Uuid,
  to: Uuid,
  existing: Option<FriendshipStatus>,
) -> Result<()> {
  match existing {
    Some(FriendshipStatus::Requested) => Ok(()),
    _ => Err(Error::RequestNotFound { from, to }),
  }
}

// ─── Edge ────────────────────────────────────────────────────────────────────

/// One directed row of the friendship relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
  pub user_id:        Uuid,
  pub friend_user_id: Uuid,
  pub status:         FriendshipStatus,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

// ─── Derived views ───────────────────────────────────────────────────────────

/// A friend's user record joined with their total accepted-friend count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendDetail {
  pub user:               User,
  pub total_friend_count: i64,
}

/// A [`FriendDetail`] together with the mutual-friend count, as produced by a
/// single batched listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendRow {
  pub detail:              FriendDetail,
  pub mutual_friend_count: i64,
}

/// The read model returned to callers — computed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendInfo {
  pub id:                  Uuid,
  pub full_name:           String,
  pub phone_number:        String,
  pub total_friend_count:  u64,
  pub mutual_friend_count: u64,
}

impl FriendInfo {
  /// Build a complete view from a detail row and a mutual-friend count.
  ///
  /// Counts come straight from SQL aggregates; a negative value means the
  /// query is broken and is reported as [`Error::InvalidCount`].
  pub fn from_detail(detail: FriendDetail, mutual_friend_count: i64) -> Result<Self> {
    Ok(Self {
      total_friend_count:  count("totalFriendCount", detail.total_friend_count)?,
      mutual_friend_count: count("mutualFriendCount", mutual_friend_count)?,
      id:                  detail.user.id,
      full_name:           detail.user.full_name,
      phone_number:        detail.user.phone_number,
    })
  }
}

impl TryFrom<FriendRow> for FriendInfo {
  type Error = Error;

  fn try_from(row: FriendRow) -> Result<Self> {
    Self::from_detail(row.detail, row.mutual_friend_count)
  }
}

fn count(field: &'static str, value: i64) -> Result<u64> {
  u64::try_from(value).map_err(|_| Error::InvalidCount { field, value })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn detail(total: i64) -> FriendDetail {
    FriendDetail {
      user:               User {
        id:           Uuid::new_v4(),
        full_name:    "Grace Hopper".into(),
        phone_number: "555-0199".into(),
        created_at:   Utc::now(),
      },
      total_friend_count: total,
    }
  }

  #[test]
  fn status_round_trips_through_str() {
    for status in [
      FriendshipStatus::Requested,
      FriendshipStatus::Accepted,
      FriendshipStatus::Declined,
    ] {
      assert_eq!(status.as_str().parse::<FriendshipStatus>().unwrap(), status);
    }
  }

  #[test]
  fn unknown_status_is_rejected() {
    let err = "blocked".parse::<FriendshipStatus>().unwrap_err();
    assert!(matches!(err, Error::UnknownStatus(ref s) if s == "blocked"));
  }

  #[test]
  fn request_allowed_from_empty_pending_and_declined() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    assert!(check_request(a, b, None).is_ok());
    assert!(check_request(a, b, Some(FriendshipStatus::Requested)).is_ok());
    assert!(check_request(a, b, Some(FriendshipStatus::Declined)).is_ok());
  }

  #[test]
  fn request_rejected_when_already_accepted() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let err = check_request(a, b, Some(FriendshipStatus::Accepted)).unwrap_err();
    assert!(matches!(err, Error::AlreadyFriends { user, friend } if user == a && friend == b));
  }

  #[test]
  fn request_to_self_rejected() {
    let a = Uuid::new_v4();
    assert!(matches!(check_request(a, a, None), Err(Error::SelfFriendship(_))));
  }

  #[test]
  fn response_requires_pending_edge() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    assert!(check_response(a, b, Some(FriendshipStatus::Requested)).is_ok());
    for existing in [
      None,
      Some(FriendshipStatus::Accepted),
      Some(FriendshipStatus::Declined),
    ] {
      assert!(matches!(
        check_response(a, b, existing),
        Err(Error::RequestNotFound { from, to }) if from == a && to == b
      ));
    }
  }

  #[test]
  fn friend_info_copies_detail() {
    let d = detail(3);
    let id = d.user.id;
    let info = FriendInfo::from_detail(d, 2).unwrap();
    assert_eq!(info.id, id);
    assert_eq!(info.full_name, "Grace Hopper");
    assert_eq!(info.total_friend_count, 3);
    assert_eq!(info.mutual_friend_count, 2);
  }

  #[test]
  fn friend_info_rejects_negative_counts() {
    let err = FriendInfo::from_detail(detail(-1), 0).unwrap_err();
    assert!(matches!(err, Error::InvalidCount { field: "totalFriendCount", value: -1 }));

    let row = FriendRow { detail: detail(1), mutual_friend_count: -4 };
    let err = FriendInfo::try_from(row).unwrap_err();
    assert!(matches!(err, Error::InvalidCount { field: "mutualFriendCount", .. }));
  }

  #[test]
  fn friend_info_serialises_exact_fields() {
    let info = FriendInfo::from_detail(detail(4), 1).unwrap();
    let json = serde_json::to_value(&info).unwrap();
    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(
      keys,
      ["fullName", "id", "mutualFriendCount", "phoneNumber", "totalFriendCount"]
    );
  }
}
