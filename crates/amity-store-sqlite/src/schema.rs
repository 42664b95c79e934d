//! SQL schema for the Amity SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id           TEXT PRIMARY KEY,
    full_name    TEXT NOT NULL CHECK (full_name    != ''),
    phone_number TEXT NOT NULL CHECK (phone_number != ''),
    created_at   TEXT NOT NULL
);

-- One directed edge per ordered pair; mutations upsert on the primary key.
CREATE TABLE IF NOT EXISTS friendships (
    user_id        TEXT NOT NULL REFERENCES users(id),
    friend_user_id TEXT NOT NULL REFERENCES users(id),
    status         TEXT NOT NULL,   -- 'requested' | 'accepted' | 'declined'
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    PRIMARY KEY (user_id, friend_user_id),
    CHECK (user_id != friend_user_id),
    CHECK (status IN ('requested', 'accepted', 'declined'))
);

CREATE INDEX IF NOT EXISTS friendships_friend_idx ON friendships(friend_user_id);
CREATE INDEX IF NOT EXISTS friendships_status_idx ON friendships(user_id, status);

PRAGMA user_version = 1;
";
