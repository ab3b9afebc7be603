//! SQL DDL for initializing the site database (SQLite).

/// SQLite schema:
/// - `users` carries either a local credential (`username` + `password_hash`),
///   a Google identity (`google_id`), or both
/// - `date_posted` is stored pre-formatted, e.g. `05 March 2025`
/// - `home_page` and `about_page` hold at most one row each; the storage layer
///   only ever inserts into them through a conditional insert
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NULL UNIQUE,
    password_hash TEXT NULL,
    google_id TEXT NULL UNIQUE,
    email TEXT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    date_posted TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    image_file TEXT NULL
);

CREATE TABLE IF NOT EXISTS home_page (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    intro_title TEXT NOT NULL,
    intro_subtitle TEXT NOT NULL,
    profile_pic TEXT NULL
);

CREATE TABLE IF NOT EXISTS about_page (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bio_text TEXT NOT NULL,
    skills TEXT NOT NULL
);
"#;
