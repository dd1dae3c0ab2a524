//! Canonical SQLite schema for the datebook store.
//!
//! The schema is normalized for queryability:
//! - `users`, `special_dates`, `wishlist_items` hold the entity records
//! - `calendar_entries` is the derived cross-user occupancy index, keyed by
//!   date string with a JSON event map (title -> summary)
//! - `store_meta` tracks the schema version alongside `PRAGMA user_version`
//!
//! Foreign keys deliberately carry no `ON DELETE CASCADE`: wishlist cascade
//! is an explicit, testable routine inside the delete transaction, and user
//! deletion is restricted while special dates remain.

/// Migration v1: entity tables, calendar index, store metadata.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE CHECK (length(trim(username)) > 0),
    email TEXT NOT NULL UNIQUE CHECK (length(trim(email)) > 0),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS special_dates (
    date_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(user_id),
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    date TEXT NOT NULL CHECK (date GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]'),
    description TEXT,
    category TEXT,
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS wishlist_items (
    item_id INTEGER PRIMARY KEY AUTOINCREMENT,
    special_date_id INTEGER NOT NULL REFERENCES special_dates(date_id),
    item_name TEXT NOT NULL CHECK (length(trim(item_name)) > 0),
    description TEXT,
    url TEXT,
    price REAL,
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS calendar_entries (
    date TEXT PRIMARY KEY CHECK (date GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]'),
    day_of_week INTEGER NOT NULL CHECK (day_of_week BETWEEN 1 AND 7),
    day INTEGER NOT NULL CHECK (day BETWEEN 1 AND 31),
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    year INTEGER NOT NULL,
    events TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL
);

INSERT OR IGNORE INTO store_meta (id, schema_version) VALUES (1, 1);
";

/// Migration v2: read-path indexes for the dashboard and wishlist queries.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_special_dates_user_date
    ON special_dates(user_id, date, date_id);

CREATE INDEX IF NOT EXISTS idx_special_dates_date
    ON special_dates(date);

CREATE INDEX IF NOT EXISTS idx_wishlist_items_parent
    ON wishlist_items(special_date_id, item_id);

UPDATE store_meta
SET schema_version = 2
WHERE id = 1;
";

/// Indexes expected by the dashboard/wishlist read paths.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_special_dates_user_date",
    "idx_special_dates_date",
    "idx_wishlist_items_parent",
];
