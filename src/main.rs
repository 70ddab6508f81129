// src/main.rs
use dotenvy::dotenv;
use resi_backend::{backend, database};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pool = database::db::connection::get_db_pool().await?;
    database::db::migrate::run_migrations(&pool).await?;

    info!("starting backend server");
    backend::run_server(pool).await?;

    Ok(())
}
