use sqlx::SqliteConnection;

use crate::database::models::{Achievement, Subscription, User};

/*
Shared low-level queries. Everything takes a `&mut SqliteConnection` so the
same helpers work against a plain pool connection or inside a transaction.
Subsystem-specific SQL lives with its service (gamification, marketplace,
subscription).
 */

/// Users are keyed by email and created on first sight, mirroring the
/// bearer-token identity scheme: whoever presents an email is that user.
pub async fn get_user_or_create(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO users (email) VALUES (?)")
        .bind(email)
        .execute(&mut *conn)
        .await?;

    sqlx::query_as::<_, User>(
        r#"
        SELECT email, has_completed_onboarding, is_premium,
               risk_profile, long_term_goals, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_one(conn)
    .await
}

/// Every public operation calls this first: a user always has exactly one
/// game profile, created zeroed the first time it is needed.
pub async fn ensure_profile(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO users (email) VALUES (?)")
        .bind(email)
        .execute(&mut *conn)
        .await?;

    sqlx::query("INSERT OR IGNORE INTO game_profiles (user_email) VALUES (?)")
        .bind(email)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn get_achievement(
    conn: &mut SqliteConnection,
    achievement_id: &str,
) -> Result<Option<Achievement>, sqlx::Error> {
    sqlx::query_as::<_, Achievement>(
        r#"
        SELECT id, name, description, icon, points, type
        FROM achievements
        WHERE id = ?
        "#,
    )
    .bind(achievement_id)
    .fetch_optional(conn)
    .await
}

pub async fn get_subscription(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<Subscription>, sqlx::Error> {
    sqlx::query_as::<_, Subscription>(
        r#"
        SELECT user_email, plan_name, start_date, end_date, payment_id
        FROM subscriptions
        WHERE user_email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(conn)
    .await
}
