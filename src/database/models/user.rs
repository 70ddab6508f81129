use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(FromRow, Debug, Clone)]
pub struct User {
    pub email: String,
    pub has_completed_onboarding: bool,
    pub is_premium: bool,
    pub risk_profile: Option<String>,
    pub long_term_goals: Option<String>,
    pub created_at: NaiveDateTime,
}
