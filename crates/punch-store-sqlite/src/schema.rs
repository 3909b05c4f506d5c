//! SQL schema for the Punch SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string, never plaintext
    role          TEXT NOT NULL CHECK (role IN ('WORKER', 'ADMIN')),
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS registered_times (
    entry_id        TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    time_registered TEXT NOT NULL,   -- ISO 8601 UTC
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS registered_times_user_idx ON registered_times(user_id);

PRAGMA user_version = 1;
";
