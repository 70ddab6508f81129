use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::database::db::queries;
use crate::database::models::{ItemStatus, MarketplaceItem, Transaction, TransactionStatus};
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub is_service: bool,
}

/// Escrow state machine over marketplace items and their transactions.
///
/// available -> (buy: hold buyer coins) -> reserved + pending
///           -> (confirm: release to seller) -> sold + completed
///
/// A buy/confirm pair is strictly a transfer between the two profiles;
/// coins enter the system only through grants and coin purchases.
#[derive(Clone)]
pub struct Marketplace {
    pool: Pool<Sqlite>,
}

impl Marketplace {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn list_item(
        &self,
        seller_email: &str,
        item: NewItem,
    ) -> DomainResult<MarketplaceItem> {
        if item.price <= 0 {
            return Err(DomainError::InvalidOperation("price must be positive"));
        }

        let mut tx = self.pool.begin().await?;

        queries::ensure_profile(&mut tx, seller_email).await?;

        let created = sqlx::query_as::<_, MarketplaceItem>(
            r#"
            INSERT INTO marketplace_items (user_email, name, description, price, is_service)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, user_email, name, description, price, is_service, status, created_at
            "#,
        )
        .bind(seller_email)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.is_service)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Newest listings first.
    pub async fn browse(&self, skip: i64, limit: i64) -> DomainResult<Vec<MarketplaceItem>> {
        let items = sqlx::query_as::<_, MarketplaceItem>(
            r#"
            SELECT id, user_email, name, description, price, is_service, status, created_at
            FROM marketplace_items
            ORDER BY id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit.clamp(1, 100))
        .bind(skip.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Starts a purchase: holds the buyer's coins, reserves the item and
    /// opens a pending transaction with a fresh confirmation code. All three
    /// writes commit together or not at all.
    pub async fn buy_item(&self, buyer_email: &str, item_id: i64) -> DomainResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        queries::ensure_profile(&mut tx, buyer_email).await?;

        let item = sqlx::query_as::<_, MarketplaceItem>(
            r#"
            SELECT id, user_email, name, description, price, is_service, status, created_at
            FROM marketplace_items
            WHERE id = ?
            "#,
        )
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::NotFound("item"))?;

        if item.status != ItemStatus::Available {
            return Err(DomainError::InvalidState("item is not available"));
        }
        if item.user_email == buyer_email {
            return Err(DomainError::InvalidOperation("cannot buy your own item"));
        }

        // Hold the coins. The balance guard in the WHERE clause makes the
        // debit fail rather than overdraw under a concurrent spend.
        let debited = sqlx::query(
            r#"
            UPDATE game_profiles
            SET resilient_coins = resilient_coins - ?
            WHERE user_email = ? AND resilient_coins >= ?
            "#,
        )
        .bind(item.price)
        .bind(buyer_email)
        .bind(item.price)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if debited == 0 {
            return Err(DomainError::InsufficientFunds);
        }

        let reserved = sqlx::query(
            "UPDATE marketplace_items SET status = ? WHERE id = ? AND status = ?",
        )
        .bind(ItemStatus::Reserved.as_str())
        .bind(item_id)
        .bind(ItemStatus::Available.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if reserved == 0 {
            return Err(DomainError::InvalidState("item is not available"));
        }

        let confirmation_code = Uuid::new_v4().to_string();
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (item_id, seller_email, buyer_email, amount, confirmation_code)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, item_id, seller_email, buyer_email, amount,
                      confirmation_code, status, created_at
            "#,
        )
        .bind(item_id)
        .bind(&item.user_email)
        .bind(buyer_email)
        .bind(item.price)
        .bind(&confirmation_code)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(transaction)
    }

    /// Seller confirms delivery (in the product, by scanning the buyer's
    /// confirmation code): releases the held coins to the seller and closes
    /// out both the transaction and the item.
    pub async fn confirm_transaction(
        &self,
        seller_email: &str,
        transaction_id: i64,
    ) -> DomainResult<Transaction> {
        let mut tx = self.pool.begin().await?;

        queries::ensure_profile(&mut tx, seller_email).await?;

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, item_id, seller_email, buyer_email, amount,
                   confirmation_code, status, created_at
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::NotFound("transaction"))?;

        // Only the recorded seller can release the escrow; anyone else sees
        // the same answer as a missing transaction.
        if transaction.seller_email != seller_email {
            return Err(DomainError::NotFound("transaction"));
        }
        if transaction.status != TransactionStatus::Pending {
            return Err(DomainError::InvalidState("transaction already settled"));
        }

        let completed = sqlx::query(
            "UPDATE transactions SET status = ? WHERE id = ? AND status = ?",
        )
        .bind(TransactionStatus::Completed.as_str())
        .bind(transaction_id)
        .bind(TransactionStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if completed == 0 {
            return Err(DomainError::InvalidState("transaction already settled"));
        }

        sqlx::query(
            r#"
            UPDATE game_profiles
            SET resilient_coins = resilient_coins + ?
            WHERE user_email = ?
            "#,
        )
        .bind(transaction.amount)
        .bind(seller_email)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE marketplace_items SET status = ? WHERE id = ?")
            .bind(ItemStatus::Sold.as_str())
            .bind(transaction.item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Transaction {
            status: TransactionStatus::Completed,
            ..transaction
        })
    }
}
