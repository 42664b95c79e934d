//! [`SqliteStore`] — the SQLite implementation of [`FriendshipStore`].

use std::path::Path;

use amity_core::{
  friendship::{
    FriendDetail, FriendRow, Friendship, FriendshipStatus, check_request,
    check_response,
  },
  store::FriendshipStore,
  user::{NewUser, User},
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawFriendRow, RawFriendship, RawUser, decode_uuid, encode_dt, encode_uuid},
  queries,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A friendship graph backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Move the pending `(from, to)` edge to `status`, optionally upserting the
  /// reverse edge with the same status, in one transaction.
  async fn respond(
    &self,
    from: Uuid,
    to: Uuid,
    status: FriendshipStatus,
    mirror: bool,
  ) -> Result<()> {
    let from_str = encode_uuid(from);
    let to_str   = encode_uuid(to);
    let now_str  = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing = match edge_status(&tx, &from_str, &to_str)? {
          Ok(s) => s,
          Err(e) => return Ok(Err(e)),
        };
        if let Err(e) = check_response(from, to, existing) {
          return Ok(Err(e));
        }

        tx.execute(
          "UPDATE friendships SET status = ?3, updated_at = ?4
           WHERE user_id = ?1 AND friend_user_id = ?2",
          rusqlite::params![from_str, to_str, status.as_str(), now_str],
        )?;
        if mirror {
          upsert_edge(&tx, &to_str, &from_str, status, &now_str)?;
        }

        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    outcome?;
    tracing::debug!(%from, %to, %status, "answered friendship request");
    Ok(())
  }
}

// ─── Transaction helpers ─────────────────────────────────────────────────────

fn user_exists(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM users WHERE id = ?1", rusqlite::params![id], |_| Ok(true))
      .optional()?
      .unwrap_or(false),
  )
}

/// Current status of the `(owner, friend)` edge. The outer result is the
/// database; the inner one rejects a status string this build doesn't know.
fn edge_status(
  conn: &rusqlite::Connection,
  owner: &str,
  friend: &str,
) -> rusqlite::Result<amity_core::Result<Option<FriendshipStatus>>> {
  let raw: Option<String> = conn
    .query_row(
      "SELECT status FROM friendships WHERE user_id = ?1 AND friend_user_id = ?2",
      rusqlite::params![owner, friend],
      |r| r.get(0),
    )
    .optional()?;
  Ok(raw.as_deref().map(str::parse).transpose())
}

fn upsert_edge(
  conn: &rusqlite::Connection,
  owner: &str,
  friend: &str,
  status: FriendshipStatus,
  now: &str,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO friendships (user_id, friend_user_id, status, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?4)
     ON CONFLICT (user_id, friend_user_id)
     DO UPDATE SET status = excluded.status, updated_at = excluded.updated_at",
    rusqlite::params![owner, friend, status.as_str(), now],
  )?;
  Ok(())
}

fn read_friendship(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawFriendship> {
  Ok(RawFriendship {
    user_id:        row.get(0)?,
    friend_user_id: row.get(1)?,
    status:         row.get(2)?,
    created_at:     row.get(3)?,
    updated_at:     row.get(4)?,
  })
}

// ─── FriendshipStore impl ────────────────────────────────────────────────────

impl FriendshipStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      id:           Uuid::new_v4(),
      full_name:    input.full_name().to_owned(),
      phone_number: input.phone_number().to_owned(),
      created_at:   Utc::now(),
    };

    let id_str       = encode_uuid(user.id);
    let full_name    = user.full_name.clone();
    let phone_number = user.phone_number.clone();
    let at_str       = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, full_name, phone_number, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, full_name, phone_number, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(user_id = %user.id, "registered user");
    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, full_name, phone_number, created_at FROM users WHERE id = ?1",
              rusqlite::params![id_str],
              |row| RawUser::from_row(row, 0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Edge mutations ────────────────────────────────────────────────────────

  async fn send_request(&self, user_id: Uuid, friend_user_id: Uuid) -> Result<Friendship> {
    let user_str   = encode_uuid(user_id);
    let friend_str = encode_uuid(friend_user_id);
    let now_str    = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        for (id, id_str) in [(user_id, &user_str), (friend_user_id, &friend_str)] {
          if !user_exists(&tx, id_str)? {
            return Ok(Err(amity_core::Error::UserNotFound(id)));
          }
        }

        let existing = match edge_status(&tx, &user_str, &friend_str)? {
          Ok(s) => s,
          Err(e) => return Ok(Err(e)),
        };
        if let Err(e) = check_request(user_id, friend_user_id, existing) {
          return Ok(Err(e));
        }

        upsert_edge(&tx, &user_str, &friend_str, FriendshipStatus::Requested, &now_str)?;

        let raw = tx.query_row(
          "SELECT user_id, friend_user_id, status, created_at, updated_at
           FROM friendships WHERE user_id = ?1 AND friend_user_id = ?2",
          rusqlite::params![user_str, friend_str],
          read_friendship,
        )?;

        tx.commit()?;
        Ok(Ok(raw))
      })
      .await?;

    let friendship = outcome?.into_friendship()?;
    tracing::debug!(%user_id, %friend_user_id, "sent friendship request");
    Ok(friendship)
  }

  async fn accept_request(&self, user_id: Uuid, friend_user_id: Uuid) -> Result<()> {
    self
      .respond(friend_user_id, user_id, FriendshipStatus::Accepted, true)
      .await
  }

  async fn decline_request(&self, user_id: Uuid, friend_user_id: Uuid) -> Result<()> {
    self
      .respond(friend_user_id, user_id, FriendshipStatus::Declined, false)
      .await
  }

  async fn outgoing_requests(&self, user_id: Uuid) -> Result<Vec<Friendship>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawFriendship> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, friend_user_id, status, created_at, updated_at
           FROM friendships WHERE user_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], read_friendship)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFriendship::into_friendship).collect()
  }

  // ── Friend-graph reads ────────────────────────────────────────────────────

  async fn friend_ids(&self, requester_id: Uuid) -> Result<Vec<Uuid>> {
    let requester_str = encode_uuid(requester_id);

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT u.id
           FROM friendships f
           JOIN users u ON u.id = f.friend_user_id
           WHERE f.user_id = ?1 AND f.status = 'accepted'",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![requester_str], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids.iter().map(|s| decode_uuid(s)).collect()
  }

  async fn friend_detail(
    &self,
    requester_id:   Uuid,
    friend_user_id: Uuid,
  ) -> Result<Option<FriendDetail>> {
    let requester_str = encode_uuid(requester_id);
    let friend_str    = encode_uuid(friend_user_id);

    let raw: Option<RawFriendRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &queries::friend_detail(),
              rusqlite::params![requester_str, friend_str],
              |row| {
                Ok(RawFriendRow {
                  user:                RawUser::from_row(row, 0)?,
                  total_friend_count:  row.get(4)?,
                  mutual_friend_count: None,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFriendRow::into_detail).transpose()
  }

  async fn mutual_friend_count(
    &self,
    requester_id:   Uuid,
    friend_user_id: Uuid,
  ) -> Result<i64> {
    let requester_str = encode_uuid(requester_id);
    let friend_str    = encode_uuid(friend_user_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &queries::mutual_friend_count("?1", "?2"),
          rusqlite::params![requester_str, friend_str],
          |r| r.get(0),
        )?)
      })
      .await?;

    Ok(count)
  }

  async fn list_friends(&self, requester_id: Uuid) -> Result<Vec<FriendRow>> {
    let requester_str = encode_uuid(requester_id);

    let raws: Vec<RawFriendRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&queries::list_friends())?;
        let rows = stmt
          .query_map(rusqlite::params![requester_str], |row| {
            Ok(RawFriendRow {
              user:                RawUser::from_row(row, 0)?,
              total_friend_count:  row.get(4)?,
              mutual_friend_count: Some(row.get(5)?),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFriendRow::into_row).collect()
  }

  async fn total_friend_counts(&self) -> Result<Vec<(Uuid, i64)>> {
    let raws: Vec<(String, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(queries::total_friend_count())?;
        let rows = stmt
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(id, count)| decode_uuid(&id).map(|id| (id, count)))
      .collect()
  }
}
