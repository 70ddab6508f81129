use chrono::Utc;
use serde::Serialize;
use sqlx::{Pool, Sqlite};
use tracing::warn;

use crate::database::db::queries;
use crate::database::models::UserAchievementProgress;
use crate::error::{DomainError, DomainResult};

/// Reward policy on achievement completion: the category tally gets the raw
/// points, resi score twice that, resilient coins five times. Fixed product
/// constants, not configuration.
const SCORE_MULTIPLIER: i64 = 2;
const COIN_MULTIPLIER: i64 = 5;

/// Largest progress delta accepted in one call. Deltas arrive from the
/// request body; catalog thresholds are tiny, so anything bigger than this
/// is garbage and would risk overflowing the progress counter.
pub const MAX_PROGRESS_DELTA: i64 = 10_000;

/// Returned only on the call where an achievement transitions to completed.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementUnlock {
    pub achievement_id: String,
    pub name: String,
    pub points: i64,
}

/// Evaluates user actions against the achievement catalog and writes the
/// reward ledger. Constructed with the datastore pool; no globals.
#[derive(Clone)]
pub struct AchievementEngine {
    pool: Pool<Sqlite>,
}

impl AchievementEngine {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Adds `delta` progress toward an achievement, completing it and paying
    /// out the reward when the point threshold is crossed.
    ///
    /// An unknown achievement id is logged and ignored: award calls are
    /// instrumentation sprinkled after user actions, and a missing catalog
    /// entry must never fail the action that triggered it. Every other
    /// failure propagates.
    ///
    /// The whole read-modify-write runs in one transaction, and the
    /// completing UPDATE is guarded on `is_completed = 0`, so two racing
    /// calls can never both pay out.
    pub async fn award_progress(
        &self,
        user_email: &str,
        achievement_id: &str,
        delta: i64,
    ) -> DomainResult<Option<AchievementUnlock>> {
        if delta <= 0 {
            return Err(DomainError::InvalidOperation(
                "progress delta must be positive",
            ));
        }
        if delta > MAX_PROGRESS_DELTA {
            return Err(DomainError::InvalidOperation(
                "progress delta exceeds the allowed maximum",
            ));
        }

        let mut tx = self.pool.begin().await?;

        let achievement = match queries::get_achievement(&mut tx, achievement_id).await? {
            Some(a) => a,
            None => {
                warn!(achievement_id, "award for unknown achievement, skipping");
                return Ok(None);
            }
        };

        queries::ensure_profile(&mut tx, user_email).await?;

        // Lazily create the progress row at zero.
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO user_achievements (user_email, achievement_id)
            VALUES (?, ?)
            "#,
        )
        .bind(user_email)
        .bind(achievement_id)
        .execute(&mut *tx)
        .await?;

        let record = sqlx::query_as::<_, UserAchievementProgress>(
            r#"
            SELECT id, user_email, achievement_id, progress, is_completed, completion_date
            FROM user_achievements
            WHERE user_email = ? AND achievement_id = ?
            "#,
        )
        .bind(user_email)
        .bind(achievement_id)
        .fetch_one(&mut *tx)
        .await?;

        if record.is_completed {
            // Past completion the call is a no-op for rewards; keep the
            // lazily created rows.
            tx.commit().await?;
            return Ok(None);
        }

        let new_progress = record.progress + delta;

        if new_progress < achievement.points {
            sqlx::query(
                r#"
                UPDATE user_achievements
                SET progress = ?
                WHERE user_email = ? AND achievement_id = ? AND is_completed = 0
                "#,
            )
            .bind(new_progress)
            .bind(user_email)
            .bind(achievement_id)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            return Ok(None);
        }

        // Threshold crossed: complete and pay out, exactly once.
        let completed_at = Utc::now().naive_utc();
        let updated = sqlx::query(
            r#"
            UPDATE user_achievements
            SET progress = ?, is_completed = 1, completion_date = ?
            WHERE user_email = ? AND achievement_id = ? AND is_completed = 0
            "#,
        )
        .bind(new_progress)
        .bind(completed_at)
        .bind(user_email)
        .bind(achievement_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            // Lost the race to a concurrent completion; their payout stands.
            tx.commit().await?;
            return Ok(None);
        }

        let tally = achievement.kind.tally_column();
        let sql = format!(
            r#"
            UPDATE game_profiles
            SET {tally} = {tally} + ?,
                resi_score = resi_score + ?,
                resilient_coins = resilient_coins + ?
            WHERE user_email = ?
            "#,
        );
        sqlx::query(&sql)
            .bind(achievement.points)
            .bind(achievement.points * SCORE_MULTIPLIER)
            .bind(achievement.points * COIN_MULTIPLIER)
            .bind(user_email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(AchievementUnlock {
            achievement_id: achievement.id,
            name: achievement.name,
            points: achievement.points,
        }))
    }
}
