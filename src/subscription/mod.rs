use chrono::{Duration, Utc};
use sqlx::{Pool, Sqlite};

use crate::database::db::queries;
use crate::database::models::Subscription;
use crate::error::{DomainError, DomainResult};

const PLAN_NAME: &str = "Premium";
const PLAN_DAYS: i64 = 30;

/// Premium entitlement gate. Flips the user flag and writes a 30-day
/// subscription window; in production this would sit behind a payment
/// gateway webhook. Premium-gated features (post limits, featured posts)
/// are enforced at their own call sites, not here.
#[derive(Clone)]
pub struct SubscriptionService {
    pool: Pool<Sqlite>,
}

impl SubscriptionService {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn upgrade_to_premium(&self, user_email: &str) -> DomainResult<Subscription> {
        let mut tx = self.pool.begin().await?;

        let user = queries::get_user_or_create(&mut tx, user_email).await?;
        if user.is_premium {
            return Err(DomainError::AlreadyPremium);
        }

        sqlx::query("UPDATE users SET is_premium = 1 WHERE email = ?")
            .bind(user_email)
            .execute(&mut *tx)
            .await?;

        let start = Utc::now().naive_utc();
        let end = start + Duration::days(PLAN_DAYS);

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (user_email, plan_name, start_date, end_date, payment_id)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (user_email) DO UPDATE SET
                plan_name = excluded.plan_name,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                payment_id = excluded.payment_id
            RETURNING user_email, plan_name, start_date, end_date, payment_id
            "#,
        )
        .bind(user_email)
        .bind(PLAN_NAME)
        .bind(start)
        .bind(end)
        .bind("simulated_payment_id_premium")
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(subscription)
    }

    /// Current subscription, if any; expiry is judged at read time.
    pub async fn get_subscription(
        &self,
        user_email: &str,
    ) -> DomainResult<Option<Subscription>> {
        let mut conn = self.pool.acquire().await?;
        let subscription = queries::get_subscription(&mut conn, user_email).await?;
        Ok(subscription)
    }
}
