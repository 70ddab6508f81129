use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use resi_backend::error::DomainError;
use resi_backend::gamification::{AchievementEngine, ProfileService};

async fn test_pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");
    pool
}

#[tokio::test]
async fn first_expense_unlocks_on_first_progress() {
    let pool = test_pool().await;
    let engine = AchievementEngine::new(pool.clone());
    let profiles = ProfileService::new(pool);

    // first_expense has points=1, so a single progress event completes it.
    let unlock = engine
        .award_progress("ana@test.local", "first_expense", 1)
        .await
        .unwrap()
        .expect("should unlock on the completing call");
    assert_eq!(unlock.achievement_id, "first_expense");
    assert_eq!(unlock.points, 1);
    assert!(!unlock.name.is_empty());

    let profile = profiles.get_profile("ana@test.local").await.unwrap();
    assert_eq!(profile.resi_score, 2, "resi score is 2x points");
    assert_eq!(profile.resilient_coins, 5, "coins are 5x points");
    assert_eq!(profile.financial_points, 1, "finance tally gets raw points");
    assert_eq!(profile.cultivation_points, 0);
    assert_eq!(profile.community_points, 0);

    let record = profile
        .achievements
        .iter()
        .find(|a| a.achievement.id == "first_expense")
        .expect("progress record present");
    assert_eq!(record.progress, 1);
    assert!(record.is_completed);
    assert!(record.completion_date.is_some());
}

#[tokio::test]
async fn awards_past_completion_never_reissue_rewards() {
    let pool = test_pool().await;
    let engine = AchievementEngine::new(pool.clone());
    let profiles = ProfileService::new(pool);

    engine
        .award_progress("ana@test.local", "first_expense", 1)
        .await
        .unwrap();
    let after_unlock = profiles.get_profile("ana@test.local").await.unwrap();

    for _ in 0..3 {
        let unlock = engine
            .award_progress("ana@test.local", "first_expense", 1)
            .await
            .unwrap();
        assert!(unlock.is_none(), "no notification after completion");
    }

    let after_repeats = profiles.get_profile("ana@test.local").await.unwrap();
    assert_eq!(after_repeats.resi_score, after_unlock.resi_score);
    assert_eq!(after_repeats.resilient_coins, after_unlock.resilient_coins);
    assert_eq!(after_repeats.financial_points, after_unlock.financial_points);
}

#[tokio::test]
async fn unlock_notification_fires_exactly_on_the_crossing_call() {
    let pool = test_pool().await;
    let engine = AchievementEngine::new(pool.clone());
    let profiles = ProfileService::new(pool);

    // budget_master needs 5 points; cross the threshold on the third call.
    let user = "leo@test.local";
    assert!(engine
        .award_progress(user, "budget_master", 2)
        .await
        .unwrap()
        .is_none());
    assert!(engine
        .award_progress(user, "budget_master", 2)
        .await
        .unwrap()
        .is_none());
    let unlock = engine
        .award_progress(user, "budget_master", 2)
        .await
        .unwrap();
    assert!(unlock.is_some(), "third call crosses 5 points");
    assert!(engine
        .award_progress(user, "budget_master", 2)
        .await
        .unwrap()
        .is_none());

    let profile = profiles.get_profile(user).await.unwrap();
    assert_eq!(profile.financial_points, 5);
    assert_eq!(profile.resi_score, 10);
    assert_eq!(profile.resilient_coins, 25);
    let record = profile
        .achievements
        .iter()
        .find(|a| a.achievement.id == "budget_master")
        .unwrap();
    assert_eq!(record.progress, 6, "progress keeps the overshoot");
}

#[tokio::test]
async fn category_tallies_route_by_achievement_kind() {
    let pool = test_pool().await;
    let engine = AchievementEngine::new(pool.clone());
    let profiles = ProfileService::new(pool);

    let user = "mia@test.local";
    engine
        .award_progress(user, "first_cultivation", 1)
        .await
        .unwrap();
    engine.award_progress(user, "first_post", 1).await.unwrap();

    let profile = profiles.get_profile(user).await.unwrap();
    assert_eq!(profile.cultivation_points, 1);
    assert_eq!(profile.community_points, 1);
    assert_eq!(profile.financial_points, 0);
    assert_eq!(profile.resi_score, 4);
    assert_eq!(profile.resilient_coins, 10);
}

#[tokio::test]
async fn unknown_achievement_is_a_silent_no_op() {
    let pool = test_pool().await;
    let engine = AchievementEngine::new(pool.clone());
    let profiles = ProfileService::new(pool);

    let unlock = engine
        .award_progress("ana@test.local", "no_such_achievement", 1)
        .await
        .unwrap();
    assert!(unlock.is_none());

    let profile = profiles.get_profile("ana@test.local").await.unwrap();
    assert_eq!(profile.resi_score, 0);
    assert_eq!(profile.resilient_coins, 0);
    assert!(profile.achievements.is_empty(), "no progress row written");
}

#[tokio::test]
async fn non_positive_delta_is_rejected() {
    let pool = test_pool().await;
    let engine = AchievementEngine::new(pool);

    let err = engine
        .award_progress("ana@test.local", "first_expense", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidOperation(_)));

    let err = engine
        .award_progress("ana@test.local", "first_expense", -3)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidOperation(_)));
}

#[tokio::test]
async fn get_profile_lazily_creates_a_zeroed_profile() {
    let pool = test_pool().await;
    let profiles = ProfileService::new(pool);

    let profile = profiles.get_profile("new@test.local").await.unwrap();
    assert_eq!(profile.resi_score, 0);
    assert_eq!(profile.resilient_coins, 0);
    assert_eq!(profile.financial_points, 0);
    assert!(profile.achievements.is_empty());

    // Second read must hit the same single profile, not create another.
    let again = profiles.get_profile("new@test.local").await.unwrap();
    assert_eq!(again.resi_score, 0);
}

#[tokio::test]
async fn grant_coins_adds_coins_and_double_score() {
    let pool = test_pool().await;
    let profiles = ProfileService::new(pool);

    let profile = profiles.grant_coins("ana@test.local", 100).await.unwrap();
    assert_eq!(profile.resilient_coins, 100);
    assert_eq!(profile.resi_score, 200);

    let profile = profiles.grant_coins("ana@test.local", 50).await.unwrap();
    assert_eq!(profile.resilient_coins, 150);
    assert_eq!(profile.resi_score, 300);
}

#[tokio::test]
async fn grant_coins_rejects_amounts_beyond_the_cap() {
    let pool = test_pool().await;
    let profiles = ProfileService::new(pool.clone());

    // An unbounded amount would overflow the score doubling before it ever
    // reaches the database.
    let err = profiles
        .grant_coins("ana@test.local", i64::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidOperation(_)));

    let err = profiles
        .grant_coins("ana@test.local", resi_backend::gamification::profile::MAX_COIN_GRANT + 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidOperation(_)));

    let profile = profiles.get_profile("ana@test.local").await.unwrap();
    assert_eq!(profile.resilient_coins, 0, "nothing credited");
    assert_eq!(profile.resi_score, 0);
}

#[tokio::test]
async fn award_progress_rejects_oversized_deltas() {
    let pool = test_pool().await;
    let engine = AchievementEngine::new(pool.clone());
    let profiles = ProfileService::new(pool);

    let err = engine
        .award_progress("ana@test.local", "first_expense", i64::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidOperation(_)));

    let profile = profiles.get_profile("ana@test.local").await.unwrap();
    assert_eq!(profile.resilient_coins, 0, "no reward paid out");
    assert!(profile.achievements.is_empty());
}

#[tokio::test]
async fn grant_coins_rejects_non_positive_amounts() {
    let pool = test_pool().await;
    let profiles = ProfileService::new(pool.clone());

    let err = profiles.grant_coins("ana@test.local", 0).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidOperation(_)));

    let err = profiles
        .grant_coins("ana@test.local", -10)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidOperation(_)));
}
