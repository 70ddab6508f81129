use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::backend::AppState;
use crate::error::DomainError;
use crate::marketplace::NewItem;

/// Domain errors mapped onto HTTP statuses at the boundary.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
            DomainError::InvalidState(_)
            | DomainError::InvalidOperation(_)
            | DomainError::AlreadyPremium => StatusCode::BAD_REQUEST,
            DomainError::Database(e) => {
                error!("database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.message }))).into_response()
    }
}

/// Identity comes in as `Authorization: Bearer <email>`; the user row is
/// created on first sight.
fn bearer_email(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|email| !email.is_empty())
        .map(|email| email.to_string())
        .ok_or(ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: "missing or malformed bearer token".to_string(),
        })
}

// ============= Gamification =============

pub async fn get_game_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let email = bearer_email(&headers)?;
    let profile = state.profiles.get_profile(&email).await?;
    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct AwardProgressReq {
    #[serde(default = "default_delta")]
    pub delta: i64,
}

fn default_delta() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct AwardProgressResp {
    pub unlocked: Option<crate::gamification::AchievementUnlock>,
}

pub async fn award_progress(
    State(state): State<AppState>,
    Path(achievement_id): Path<String>,
    headers: HeaderMap,
    payload: Option<Json<AwardProgressReq>>,
) -> Result<impl IntoResponse, ApiError> {
    let email = bearer_email(&headers)?;
    // A body-less POST counts a single progress event.
    let delta = payload.map(|Json(p)| p.delta).unwrap_or_else(default_delta);
    let unlocked = state
        .engine
        .award_progress(&email, &achievement_id, delta)
        .await?;
    Ok(Json(AwardProgressResp { unlocked }))
}

#[derive(Debug, Deserialize)]
pub struct CoinGrantReq {
    pub amount: i64,
}

pub async fn earn_coins(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CoinGrantReq>,
) -> Result<impl IntoResponse, ApiError> {
    let email = bearer_email(&headers)?;
    let profile = state.profiles.grant_coins(&email, payload.amount).await?;
    Ok(Json(profile))
}

// ============= Marketplace =============

pub async fn create_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<NewItem>,
) -> Result<impl IntoResponse, ApiError> {
    let email = bearer_email(&headers)?;
    let item = state.market.list_item(&email, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

pub async fn get_items(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state.market.browse(page.skip, page.limit).await?;
    Ok(Json(items))
}

pub async fn buy_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let email = bearer_email(&headers)?;
    let transaction = state.market.buy_item(&email, item_id).await?;
    Ok(Json(transaction))
}

pub async fn confirm_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<i64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let email = bearer_email(&headers)?;
    let transaction = state
        .market
        .confirm_transaction(&email, transaction_id)
        .await?;
    Ok(Json(transaction))
}

// ============= Subscriptions =============

pub async fn upgrade_premium(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let email = bearer_email(&headers)?;
    let subscription = state.subscriptions.upgrade_to_premium(&email).await?;
    Ok(Json(subscription))
}

pub async fn buy_coins(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CoinGrantReq>,
) -> Result<impl IntoResponse, ApiError> {
    let email = bearer_email(&headers)?;
    let profile = state.profiles.grant_coins(&email, payload.amount).await?;
    Ok(Json(profile))
}
