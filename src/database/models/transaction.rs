use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Escrow record created together with the coin hold of a purchase.
/// `amount` is copied from the item price at purchase time and never
/// changes afterwards.
#[derive(FromRow, Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub item_id: i64,
    pub seller_email: String,
    pub buyer_email: String,
    pub amount: i64,
    pub confirmation_code: String,
    #[sqlx(try_from = "String")]
    pub status: TransactionStatus,
    pub created_at: NaiveDateTime,
}

/// `completed` and `cancelled` are terminal. Nothing currently produces
/// `cancelled`; there is no refund path for a pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<String> for TransactionStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown transaction status: {}", other)),
        }
    }
}
