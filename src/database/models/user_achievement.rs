use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Per-(user, achievement) progress row. Created lazily on the first
/// progress event; `progress` only ever grows and `is_completed` flips
/// false -> true exactly once.
#[derive(FromRow, Debug, Clone)]
pub struct UserAchievementProgress {
    pub id: i64,
    pub user_email: String,
    pub achievement_id: String,
    pub progress: i64,
    pub is_completed: bool,
    pub completion_date: Option<NaiveDateTime>,
}
