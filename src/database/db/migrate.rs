use anyhow::Result;
use sqlx::{Pool, Sqlite};

/// Applies the embedded migrations; also seeds the achievement catalog,
/// which lives in the same migration file.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}