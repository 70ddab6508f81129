mod handlers;
mod routes;

use axum::{
    routing::get,
    Router,
};
use sqlx::{Pool, Sqlite};
use std::net::SocketAddr;
use tracing::info;

use crate::gamification::{AchievementEngine, ProfileService};
use crate::marketplace::Marketplace;
use crate::subscription::SubscriptionService;

#[derive(Clone)]
pub struct AppState {
    pub engine: AchievementEngine,
    pub profiles: ProfileService,
    pub market: Marketplace,
    pub subscriptions: SubscriptionService,
}

impl AppState {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            engine: AchievementEngine::new(pool.clone()),
            profiles: ProfileService::new(pool.clone()),
            market: Marketplace::new(pool.clone()),
            subscriptions: SubscriptionService::new(pool),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "Backend is running" }))
        .merge(routes::api_routes())
        .with_state(state)
}

pub async fn run_server(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let app = build_app(AppState::new(pool));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
