use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::env;

pub async fn get_db_pool() -> Result<Pool<Sqlite>, sqlx::Error> {
    // Same fallback the original backend used when no DATABASE_URL is set.
    let db_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://resi.db?mode=rwc".to_string());

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
}