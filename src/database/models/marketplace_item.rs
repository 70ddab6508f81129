use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct MarketplaceItem {
    pub id: i64,
    pub user_email: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub is_service: bool,
    #[sqlx(try_from = "String")]
    pub status: ItemStatus,
    pub created_at: NaiveDateTime,
}

/// Listing lifecycle. Transitions are driven only by the escrow flow:
/// available -> reserved (buy) -> sold (confirm).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Available,
    Reserved,
    Sold,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Sold => "sold",
        }
    }
}

impl TryFrom<String> for ItemStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "sold" => Ok(Self::Sold),
            other => Err(format!("unknown item status: {}", other)),
        }
    }
}
