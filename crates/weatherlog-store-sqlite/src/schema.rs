//! SQL schema for the weatherlog SQLite store.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS weather_data (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    location    TEXT NOT NULL,
    temperature REAL NOT NULL,
    conditions  TEXT NOT NULL,
    timestamp   TEXT NOT NULL    -- RFC 3339 UTC, microseconds; store-assigned
);

CREATE INDEX IF NOT EXISTS weather_data_location_idx
    ON weather_data(location, timestamp);
";
