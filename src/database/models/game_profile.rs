use serde::Serialize;
use sqlx::FromRow;

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct GameProfile {
    pub user_email: String,
    pub resi_score: i64,
    pub resilient_coins: i64,
    pub financial_points: i64,
    pub cultivation_points: i64,
    pub community_points: i64,
}
