//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `metadata` table (named integer cells; holds the global `revision` counter)
/// - one table per content type, each row carrying the `revision` it was last written at
///
/// Foreign keys are enforced per connection (`foreign_keys = ON`), so referenced
/// tables are created before the tables that point at them.
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Named integer cells (key = 'revision' is the sync counter)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS metadata (
    id INTEGER PRIMARY KEY NOT NULL,
    key TEXT NOT NULL UNIQUE,
    value INTEGER NOT NULL
);

-- ---------------------------------------------------------------------------
-- View-controller templates (catalog)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS view_controllers (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    segue_id TEXT NOT NULL UNIQUE,
    revision INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_view_controllers_revision ON view_controllers(revision);

-- ---------------------------------------------------------------------------
-- Media resources (bytes live in the file server, keyed by url)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS media_resources (
    id INTEGER PRIMARY KEY NOT NULL,
    url TEXT NOT NULL UNIQUE,
    revision INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_media_resources_revision ON media_resources(revision);

-- ---------------------------------------------------------------------------
-- Exhibit sections
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS exhibit_sections (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NULL,
    revision INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_exhibit_sections_revision ON exhibit_sections(revision);

-- ---------------------------------------------------------------------------
-- Exhibits
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS exhibits (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    text TEXT NOT NULL,
    exhibit_section_id INTEGER NOT NULL REFERENCES exhibit_sections(id),
    view_controller_id INTEGER NOT NULL REFERENCES view_controllers(id),
    resource_id INTEGER NOT NULL REFERENCES media_resources(id),
    revision INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_exhibits_revision ON exhibits(revision);

-- ---------------------------------------------------------------------------
-- Events
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    resource_id INTEGER NOT NULL REFERENCES media_resources(id),
    start_time TEXT NOT NULL, -- RFC3339
    end_time TEXT NOT NULL, -- RFC3339
    revision INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_revision ON events(revision);

-- ---------------------------------------------------------------------------
-- Venue information
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS information (
    id INTEGER PRIMARY KEY NOT NULL,
    information TEXT NOT NULL,
    parking TEXT NOT NULL,
    hours TEXT NOT NULL,
    location TEXT NOT NULL,
    revision INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_information_revision ON information(revision);
"#;
