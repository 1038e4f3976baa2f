//! # Cart Repository
//!
//! The per-account staging cart.
//!
//! ## The Checked Add
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    add(account, card) - one transaction                 │
//! │                                                                         │
//! │  1. Card exists in catalog?          no → CardNotFound                 │
//! │  2. Account already owns it?        yes → AlreadyOwned                 │
//! │  3. owned + staged >= 3?            yes → LimitExceeded                │
//! │  4. Already staged in cart?         yes → DuplicateInCart              │
//! │  5. INSERT cart row (timestamped)                                      │
//! │                                                                         │
//! │  The check order is part of the API contract: callers see the same     │
//! │  error precedence every time. Do not reorder.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All checks and the insert run inside one transaction so the counts the
//! checks observe are the counts the insert commits against.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbResult, StoreResult};
use cardex_core::{holding, CartEntry, CartLine, CoreError};

/// Repository for cart staging operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Lists the account's cart, each entry joined with its card.
    ///
    /// Ordered by staging time (entry id as tiebreak) - the same order the
    /// purchase engine processes entries in.
    pub async fn list(&self, account_id: &str) -> DbResult<Vec<CartLine>> {
        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT
                ce.id AS entry_id,
                c.id, c.name, c.element, c.power, c.ability,
                c.price_cents, c.rarity, c.image_url, c.collector_number,
                c.created_at,
                ce.added_at
            FROM cart_entries ce
            INNER JOIN cards c ON c.id = ce.card_id
            WHERE ce.account_id = ?1
            ORDER BY ce.added_at, ce.id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Counts the account's cart rows.
    pub async fn count(&self, account_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cart_entries WHERE account_id = ?1")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Stages a card into the account's cart.
    ///
    /// Runs the full check sequence (see module docs) and the insert inside
    /// one transaction. The staging timestamp is assigned here.
    ///
    /// ## Errors
    /// In precedence order: `CardNotFound`, `AlreadyOwned`, `LimitExceeded`,
    /// `DuplicateInCart`.
    pub async fn add(&self, account_id: &str, card_id: &str) -> StoreResult<CartEntry> {
        debug!(account_id = %account_id, card_id = %card_id, "Adding card to cart");

        let mut tx = self.pool.begin().await?;

        // 1. The card must exist in the catalog.
        let card_exists: Option<String> = sqlx::query_scalar("SELECT id FROM cards WHERE id = ?1")
            .bind(card_id)
            .fetch_optional(&mut *tx)
            .await?;

        if card_exists.is_none() {
            return Err(CoreError::CardNotFound(card_id.to_string()).into());
        }

        // 2. An owned card cannot be staged again.
        let owned_copy: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ownerships WHERE account_id = ?1 AND card_id = ?2",
        )
        .bind(account_id)
        .bind(card_id)
        .fetch_one(&mut *tx)
        .await?;

        if owned_copy > 0 {
            return Err(CoreError::AlreadyOwned {
                card_id: card_id.to_string(),
            }
            .into());
        }

        // 3. Holding limit, against the pre-insert counts.
        let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ownerships WHERE account_id = ?1")
            .bind(account_id)
            .fetch_one(&mut *tx)
            .await?;

        let staged: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cart_entries WHERE account_id = ?1")
                .bind(account_id)
                .fetch_one(&mut *tx)
                .await?;

        holding::check_can_stage(owned, staged)?;

        // 4. No duplicate staging of the same card.
        let staged_copy: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM cart_entries WHERE account_id = ?1 AND card_id = ?2",
        )
        .bind(account_id)
        .bind(card_id)
        .fetch_one(&mut *tx)
        .await?;

        if staged_copy > 0 {
            return Err(CoreError::DuplicateInCart {
                card_id: card_id.to_string(),
            }
            .into());
        }

        // 5. All checks passed - stage the card.
        let entry = CartEntry {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            card_id: card_id.to_string(),
            added_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO cart_entries (id, account_id, card_id, added_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.account_id)
        .bind(&entry.card_id)
        .bind(entry.added_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(entry)
    }

    /// Removes a single cart entry by its id.
    ///
    /// The entry must belong to the calling account - an entry id from
    /// another account's cart is indistinguishable from a missing one.
    ///
    /// ## Errors
    /// * `CartEntryNotFound` - no matching entry for this account
    pub async fn remove(&self, account_id: &str, entry_id: &str) -> StoreResult<()> {
        debug!(account_id = %account_id, entry_id = %entry_id, "Removing cart entry");

        let result = sqlx::query("DELETE FROM cart_entries WHERE id = ?1 AND account_id = ?2")
            .bind(entry_id)
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::CartEntryNotFound(entry_id.to_string()).into());
        }

        Ok(())
    }

    /// Clears every entry from the account's cart.
    ///
    /// Idempotent: clearing an empty cart is a no-op, not an error.
    ///
    /// ## Returns
    /// Number of entries removed.
    pub async fn clear(&self, account_id: &str) -> DbResult<u64> {
        debug!(account_id = %account_id, "Clearing cart");

        let result = sqlx::query("DELETE FROM cart_entries WHERE account_id = ?1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
