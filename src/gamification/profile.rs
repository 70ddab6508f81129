use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{Pool, Row, Sqlite};

use crate::database::db::queries;
use crate::database::models::{Achievement, GameProfile};
use crate::error::{DomainError, DomainResult};

/// Largest single coin grant accepted from a caller.
pub const MAX_COIN_GRANT: i64 = 1_000_000;

#[derive(Debug, Clone, Serialize)]
pub struct UserAchievementView {
    pub achievement: Achievement,
    pub progress: i64,
    pub is_completed: bool,
    pub completion_date: Option<NaiveDateTime>,
}

/// Profile counters plus the user's progress against the full catalog,
/// shaped for display.
#[derive(Debug, Clone, Serialize)]
pub struct GameProfileView {
    pub resi_score: i64,
    pub resilient_coins: i64,
    pub financial_points: i64,
    pub cultivation_points: i64,
    pub community_points: i64,
    pub achievements: Vec<UserAchievementView>,
}

/// Read side of the reward ledger, plus the direct coin-grant entry point.
#[derive(Clone)]
pub struct ProfileService {
    pool: Pool<Sqlite>,
}

impl ProfileService {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Lazily creates a zeroed profile on first read.
    pub async fn get_profile(&self, user_email: &str) -> DomainResult<GameProfileView> {
        let mut conn = self.pool.acquire().await?;

        queries::ensure_profile(&mut conn, user_email).await?;

        let profile = sqlx::query_as::<_, GameProfile>(
            r#"
            SELECT user_email, resi_score, resilient_coins,
                   financial_points, cultivation_points, community_points
            FROM game_profiles
            WHERE user_email = ?
            "#,
        )
        .bind(user_email)
        .fetch_one(&mut *conn)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT a.id, a.name, a.description, a.icon, a.points, a.type,
                   ua.progress, ua.is_completed, ua.completion_date
            FROM user_achievements ua
            JOIN achievements a ON a.id = ua.achievement_id
            WHERE ua.user_email = ?
            ORDER BY a.id
            "#,
        )
        .bind(user_email)
        .fetch_all(&mut *conn)
        .await?;

        let mut achievements = Vec::with_capacity(rows.len());
        for row in rows {
            let kind: String = row.try_get("type")?;
            achievements.push(UserAchievementView {
                achievement: Achievement {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    description: row.try_get("description")?,
                    icon: row.try_get("icon")?,
                    points: row.try_get("points")?,
                    kind: kind.try_into().map_err(|e: String| {
                        sqlx::Error::Decode(e.into())
                    })?,
                },
                progress: row.try_get("progress")?,
                is_completed: row.try_get("is_completed")?,
                completion_date: row.try_get("completion_date")?,
            });
        }

        Ok(GameProfileView {
            resi_score: profile.resi_score,
            resilient_coins: profile.resilient_coins,
            financial_points: profile.financial_points,
            cultivation_points: profile.cultivation_points,
            community_points: profile.community_points,
            achievements,
        })
    }

    /// Direct currency grant (coin purchase, promotions). Adds `amount`
    /// coins and bumps resi score by twice that. Strictly positive and
    /// capped: the amount arrives from the request body, and unbounded
    /// values would overflow the score multiplication and the balance.
    pub async fn grant_coins(&self, user_email: &str, amount: i64) -> DomainResult<GameProfile> {
        if amount <= 0 {
            return Err(DomainError::InvalidOperation(
                "coin grant must be positive",
            ));
        }
        if amount > MAX_COIN_GRANT {
            return Err(DomainError::InvalidOperation(
                "coin grant exceeds the allowed maximum",
            ));
        }

        let mut tx = self.pool.begin().await?;

        queries::ensure_profile(&mut tx, user_email).await?;

        let profile = sqlx::query_as::<_, GameProfile>(
            r#"
            UPDATE game_profiles
            SET resilient_coins = resilient_coins + ?,
                resi_score = resi_score + ?
            WHERE user_email = ?
            RETURNING user_email, resi_score, resilient_coins,
                      financial_points, cultivation_points, community_points
            "#,
        )
        .bind(amount)
        .bind(amount * 2)
        .bind(user_email)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(profile)
    }
}
