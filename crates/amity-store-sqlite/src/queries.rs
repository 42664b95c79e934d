//! SQL for the friend-graph reads.
//!
//! The two aggregates are kept as fragments so the single-friend lookups and
//! the batched listing are built from the same text and cannot drift apart.

/// Derived table `(user_id, total_friend_count)`: accepted outgoing edges per
/// user. Users with none are absent, so callers `LEFT JOIN` and coalesce.
pub fn total_friend_count() -> &'static str {
  "SELECT user_id, COUNT(friend_user_id) AS total_friend_count
   FROM friendships
   WHERE status = 'accepted'
   GROUP BY user_id"
}

/// Scalar subquery counting users both `requester` and `friend` have accepted
/// edges to, excluding the two of them. The arguments are SQL expressions
/// (bound parameters or outer column references).
pub fn mutual_friend_count(requester: &str, friend: &str) -> String {
  format!(
    "SELECT COUNT(DISTINCT a.friend_user_id)
     FROM friendships a
     JOIN friendships b ON b.friend_user_id = a.friend_user_id
     WHERE a.user_id = {requester} AND a.status = 'accepted'
       AND b.user_id = {friend}    AND b.status = 'accepted'
       AND a.friend_user_id NOT IN ({requester}, {friend})"
  )
}

/// `?1` = requester, `?2` = friend.
pub fn friend_detail() -> String {
  format!(
    "SELECT u.id, u.full_name, u.phone_number, u.created_at,
            COALESCE(t.total_friend_count, 0)
     FROM users u
     JOIN friendships f ON f.friend_user_id = u.id
     LEFT JOIN ({total}) t ON t.user_id = u.id
     WHERE f.user_id = ?1
       AND f.friend_user_id = ?2
       AND f.status = 'accepted'",
    total = total_friend_count(),
  )
}

/// `?1` = requester. One row per accepted friend with both counts.
pub fn list_friends() -> String {
  format!(
    "SELECT u.id, u.full_name, u.phone_number, u.created_at,
            COALESCE(t.total_friend_count, 0),
            ({mutual}) AS mutual_friend_count
     FROM friendships f
     JOIN users u ON u.id = f.friend_user_id
     LEFT JOIN ({total}) t ON t.user_id = u.id
     WHERE f.user_id = ?1
       AND f.status = 'accepted'",
    mutual = mutual_friend_count("f.user_id", "f.friend_user_id"),
    total = total_friend_count(),
  )
}
