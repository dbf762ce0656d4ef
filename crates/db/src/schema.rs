//! DDL for the tables the store backends read and write.

/// The catalog table. `AUTOINCREMENT` keeps deleted identifiers from being
/// handed out again; the unique index backs ISBN uniqueness.
pub const CREATE_BOOKS: &str = r#"
CREATE TABLE books (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    title            TEXT    NOT NULL,
    author           TEXT    NOT NULL,
    isbn             TEXT    NOT NULL,
    genre            TEXT    NOT NULL,
    published_year   INTEGER NOT NULL,
    publisher        TEXT    NOT NULL,
    description      TEXT,
    total_copies     INTEGER NOT NULL CHECK (total_copies >= 0),
    available_copies INTEGER NOT NULL CHECK (available_copies >= 0 AND available_copies <= total_copies)
);
CREATE UNIQUE INDEX books_isbn_unique ON books (isbn);
"#;

/// Bookkeeping table for applied module migrations.
pub(crate) const CREATE_MIGRATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS _libris_migrations (
    module     TEXT NOT NULL,
    id         TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (module, id)
)
"#;
