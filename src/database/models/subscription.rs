use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct Subscription {
    pub user_email: String,
    pub plan_name: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub payment_id: String,
}

impl Subscription {
    /// Expiry is evaluated lazily when the row is read; there is no
    /// background reaper.
    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        now < self.end_date
    }
}
