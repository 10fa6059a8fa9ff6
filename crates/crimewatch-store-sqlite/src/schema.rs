//! SQL schema for the crimewatch SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Seeded once from the reference table; never updated or deleted.
CREATE TABLE IF NOT EXISTS districts (
    district_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE COLLATE NOCASE,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL
);

-- Incidents are strictly append-only.
-- The UNIQUE constraint on source_url is the last line of defense against
-- overlapping ingestion runs.
CREATE TABLE IF NOT EXISTS incidents (
    incident_id   TEXT PRIMARY KEY,
    district_id   TEXT NOT NULL REFERENCES districts(district_id),
    title         TEXT NOT NULL,
    description   TEXT NOT NULL DEFAULT '',
    source_url    TEXT NOT NULL UNIQUE,
    incident_date TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    category      TEXT NOT NULL DEFAULT '',
    created_at    TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS incidents_district_idx ON incidents(district_id);
CREATE INDEX IF NOT EXISTS incidents_date_idx     ON incidents(incident_date);

PRAGMA user_version = 1;
";
