//! [`FriendshipQueryService`] — "who are my friends and what do we share".
//!
//! The service answers for a single, already-authenticated requester. It is
//! stateless apart from the store handle, so one instance can serve any number
//! of concurrent requests.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::{friendship::FriendInfo, store::FriendshipStore};

/// Failure of a friend-list query.
#[derive(Debug, Error)]
pub enum QueryError<E> {
  /// No accepted `(requester, friend)` edge exists.
  #[error("{requester} has no accepted friendship with {friend}")]
  NotFound { requester: Uuid, friend: Uuid },

  /// A store row could not be turned into a [`FriendInfo`].
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] E),
}

pub type QueryResult<T, E> = std::result::Result<T, QueryError<E>>;

/// Read-only friend-list queries over any [`FriendshipStore`].
pub struct FriendshipQueryService<S> {
  store: Arc<S>,
}

impl<S> Clone for FriendshipQueryService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: FriendshipStore> FriendshipQueryService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// The [`FriendInfo`] for `friend_user_id`, provided `requester_id` has an
  /// accepted edge to them.
  ///
  /// The mutual-friend count is only queried once the friendship is known to
  /// exist.
  pub async fn get_friend_by_id(
    &self,
    requester_id: Uuid,
    friend_user_id: Uuid,
  ) -> QueryResult<FriendInfo, S::Error> {
    let detail = self
      .store
      .friend_detail(requester_id, friend_user_id)
      .await
      .map_err(QueryError::Store)?
      .ok_or(QueryError::NotFound {
        requester: requester_id,
        friend:    friend_user_id,
      })?;

    let mutual = self
      .store
      .mutual_friend_count(requester_id, friend_user_id)
      .await
      .map_err(QueryError::Store)?;

    let info = FriendInfo::from_detail(detail, mutual)
      .map_err(|e| QueryError::BadRequest(e.to_string()))?;

    tracing::debug!(%requester_id, %friend_user_id, "resolved friend");
    Ok(info)
  }

  /// Every accepted friend of `requester_id`, each with both counts.
  ///
  /// Fetched in one batched store call. A single malformed row fails the
  /// whole call; partial lists are never returned. Order is unspecified.
  pub async fn get_all_friends(
    &self,
    requester_id: Uuid,
  ) -> QueryResult<Vec<FriendInfo>, S::Error> {
    let rows = self
      .store
      .list_friends(requester_id)
      .await
      .map_err(QueryError::Store)?;

    let friends = rows
      .into_iter()
      .map(|row| {
        let friend_user_id = row.detail.user.id;
        FriendInfo::try_from(row).map_err(|e| {
          tracing::warn!(%requester_id, %friend_user_id, error = %e, "rejected friend row");
          QueryError::BadRequest(e.to_string())
        })
      })
      .collect::<QueryResult<Vec<_>, S::Error>>()?;

    tracing::debug!(%requester_id, count = friends.len(), "listed friends");
    Ok(friends)
  }
}

#[cfg(test)]
mod tests {
  use std::{collections::HashMap, convert::Infallible};

  use chrono::Utc;

  use super::*;
  use crate::{
    friendship::{FriendDetail, FriendRow, Friendship},
    user::{NewUser, User},
  };

  /// Canned answers keyed by `(requester, friend)`; only the read methods the
  /// service calls are implemented.
  #[derive(Default)]
  struct CannedStore {
    details: HashMap<(Uuid, Uuid), FriendDetail>,
    mutual:  HashMap<(Uuid, Uuid), i64>,
  }

  impl CannedStore {
    fn befriend(&mut self, requester: Uuid, name: &str, total: i64, mutual: i64) -> Uuid {
      let id = Uuid::new_v4();
      self.details.insert((requester, id), FriendDetail {
        user:               User {
          id,
          full_name: name.into(),
          phone_number: "555-0100".into(),
          created_at: Utc::now(),
        },
        total_friend_count: total,
      });
      self.mutual.insert((requester, id), mutual);
      id
    }
  }

  impl FriendshipStore for CannedStore {
    type Error = Infallible;

    async fn add_user(&self, _: NewUser) -> Result<User, Infallible> { unimplemented!() }
    async fn get_user(&self, _: Uuid) -> Result<Option<User>, Infallible> { unimplemented!() }
    async fn send_request(&self, _: Uuid, _: Uuid) -> Result<Friendship, Infallible> { unimplemented!() }
    async fn accept_request(&self, _: Uuid, _: Uuid) -> Result<(), Infallible> { unimplemented!() }
    async fn decline_request(&self, _: Uuid, _: Uuid) -> Result<(), Infallible> { unimplemented!() }
    async fn outgoing_requests(&self, _: Uuid) -> Result<Vec<Friendship>, Infallible> { unimplemented!() }
    async fn total_friend_counts(&self) -> Result<Vec<(Uuid, i64)>, Infallible> { unimplemented!() }

    async fn friend_ids(&self, requester_id: Uuid) -> Result<Vec<Uuid>, Infallible> {
      Ok(self.details.keys().filter(|(r, _)| *r == requester_id).map(|(_, f)| *f).collect())
    }

    async fn friend_detail(&self, requester_id: Uuid, friend_user_id: Uuid) -> Result<Option<FriendDetail>, Infallible> {
      Ok(self.details.get(&(requester_id, friend_user_id)).cloned())
    }

    async fn mutual_friend_count(&self, requester_id: Uuid, friend_user_id: Uuid) -> Result<i64, Infallible> {
      Ok(self.mutual.get(&(requester_id, friend_user_id)).copied().unwrap_or(0))
    }

    async fn list_friends(&self, requester_id: Uuid) -> Result<Vec<FriendRow>, Infallible> {
      Ok(
        self
          .details
          .iter()
          .filter(|((r, _), _)| *r == requester_id)
          .map(|(key, detail)| FriendRow {
            detail:              detail.clone(),
            mutual_friend_count: self.mutual[key],
          })
          .collect(),
      )
    }
  }

  fn service(store: CannedStore) -> FriendshipQueryService<CannedStore> {
    FriendshipQueryService::new(Arc::new(store))
  }

  #[tokio::test]
  async fn get_friend_by_id_merges_counts() {
    let me = Uuid::new_v4();
    let mut store = CannedStore::default();
    let friend = store.befriend(me, "Bea", 3, 2);

    let info = service(store).get_friend_by_id(me, friend).await.unwrap();
    assert_eq!(info.id, friend);
    assert_eq!(info.full_name, "Bea");
    assert_eq!(info.total_friend_count, 3);
    assert_eq!(info.mutual_friend_count, 2);
  }

  #[tokio::test]
  async fn get_friend_by_id_not_found() {
    let me = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let err = service(CannedStore::default())
      .get_friend_by_id(me, stranger)
      .await
      .unwrap_err();
    assert!(matches!(err, QueryError::NotFound { requester, friend } if requester == me && friend == stranger));
  }

  #[tokio::test]
  async fn get_friend_by_id_rejects_negative_mutual_count() {
    let me = Uuid::new_v4();
    let mut store = CannedStore::default();
    let friend = store.befriend(me, "Bea", 1, -1);

    let err = service(store).get_friend_by_id(me, friend).await.unwrap_err();
    assert!(matches!(err, QueryError::BadRequest(_)));
  }

  #[tokio::test]
  async fn get_all_friends_lists_only_requesters_friends() {
    let (me, other) = (Uuid::new_v4(), Uuid::new_v4());
    let mut store = CannedStore::default();
    let b = store.befriend(me, "Bea", 3, 2);
    let c = store.befriend(me, "Cal", 2, 1);
    store.befriend(other, "Dee", 1, 0);

    let mut friends = service(store).get_all_friends(me).await.unwrap();
    friends.sort_by(|x, y| x.full_name.cmp(&y.full_name));

    assert_eq!(friends.len(), 2);
    assert_eq!((friends[0].id, friends[0].mutual_friend_count), (b, 2));
    assert_eq!((friends[1].id, friends[1].total_friend_count), (c, 2));
  }

  #[tokio::test]
  async fn get_all_friends_fails_whole_call_on_bad_row() {
    let me = Uuid::new_v4();
    let mut store = CannedStore::default();
    store.befriend(me, "Bea", 3, 2);
    store.befriend(me, "Cal", -7, 0);

    let err = service(store).get_all_friends(me).await.unwrap_err();
    assert!(matches!(err, QueryError::BadRequest(ref m) if m.contains("totalFriendCount")));
  }

  #[tokio::test]
  async fn get_all_friends_empty() {
    let friends = service(CannedStore::default())
      .get_all_friends(Uuid::new_v4())
      .await
      .unwrap();
    assert!(friends.is_empty());
  }
}
