use axum::{
    routing::{get, post},
    Router,
};
use crate::backend::{handlers, AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/gamification", get(handlers::get_game_profile))
        .route(
            "/gamification/achievements/:achievement_id/progress",
            post(handlers::award_progress),
        )
        .route("/gamification/earn-coins", post(handlers::earn_coins))
        .route(
            "/market/items",
            post(handlers::create_item).get(handlers::get_items),
        )
        .route("/market/items/:item_id/buy", post(handlers::buy_item))
        .route(
            "/market/transactions/:transaction_id/confirm",
            post(handlers::confirm_transaction),
        )
        .route("/subscriptions/premium", post(handlers::upgrade_premium))
        .route("/subscriptions/buy-coins", post(handlers::buy_coins))
}
