//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: `SiteStorage`, every query the site runs

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{AboutPage, DEFAULT_PROFILE_PIC, DbUser, HomePage, Post, Project};
pub use schema::SQLITE_INIT;
pub use sqlite::{SiteStorage, SqlitePool};

use crate::error::SiteError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// Open (creating if missing) the database and make sure the schema exists.
pub async fn connect(database_url: &str) -> Result<SiteStorage, SiteError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    let storage = SiteStorage::new(pool);
    storage.init_schema().await?;
    info!(database_url = %database_url, "database ready");
    Ok(storage)
}
