use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tower::ServiceExt;

use resi_backend::backend::{build_app, AppState};
use resi_backend::gamification::ProfileService;
use resi_backend::marketplace::{Marketplace, NewItem};

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

async fn read_json(res: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json")
}

fn bearer(email: &str) -> String {
    format!("Bearer {email}")
}

#[tokio::test]
async fn body_less_award_post_counts_one_progress_event() {
    let pool = test_pool().await;
    let app = build_app(AppState::new(pool));

    // No body at all: delta defaults to 1, enough to finish first_expense.
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gamification/achievements/first_expense/progress")
                .header("authorization", bearer("ana@test.local"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = read_json(res).await;
    assert_eq!(body["unlocked"]["achievement_id"], "first_expense");
    assert_eq!(body["unlocked"]["points"], 1);
}

#[tokio::test]
async fn award_post_accepts_an_explicit_delta() {
    let pool = test_pool().await;
    let app = build_app(AppState::new(pool));

    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gamification/achievements/budget_master/progress")
                .header("authorization", bearer("ana@test.local"))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"delta": 5}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = read_json(res).await;
    assert_eq!(body["unlocked"]["achievement_id"], "budget_master");
}

#[tokio::test]
async fn missing_bearer_token_is_unauthorized() {
    let pool = test_pool().await;
    let app = build_app(AppState::new(pool));

    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gamification/achievements/first_expense/progress")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn broke_buyer_gets_payment_required() {
    let pool = test_pool().await;
    let market = Marketplace::new(pool.clone());
    let item = market
        .list_item(
            "seller@test.local",
            NewItem {
                name: "Compost workshop".to_string(),
                description: "Taller de compostaje".to_string(),
                price: 100,
                is_service: true,
            },
        )
        .await
        .unwrap();

    let app = build_app(AppState::new(pool));
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/market/items/{}/buy", item.id))
                .header("authorization", bearer("broke@test.local"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn oversized_coin_grant_is_a_bad_request() {
    let pool = test_pool().await;
    let profiles = ProfileService::new(pool.clone());
    let app = build_app(AppState::new(pool));

    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/gamification/earn-coins")
                .header("authorization", bearer("ana@test.local"))
                .header("content-type", "application/json")
                .body(Body::from(format!(r#"{{"amount": {}}}"#, i64::MAX)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let profile = profiles.get_profile("ana@test.local").await.unwrap();
    assert_eq!(profile.resilient_coins, 0);
}
