//! # Ownership Repository
//!
//! The per-account ownership ledger.
//!
//! ## Invariant
//! At most one ledger row exists per (account, card) pair - an account can
//! never own two copies of the same card. The UNIQUE index backs up the
//! explicit check in [`OwnershipRepository::grant`].
//!
//! Acquisition timestamps are assigned here, never by callers.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbResult, StoreResult};
use cardex_core::{CoreError, OwnedCard, Ownership};

/// Repository for ownership ledger operations.
#[derive(Debug, Clone)]
pub struct OwnershipRepository {
    pool: SqlitePool,
}

impl OwnershipRepository {
    /// Creates a new OwnershipRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OwnershipRepository { pool }
    }

    /// Lists an account's collection with acquisition timestamps.
    ///
    /// Ordered by acquisition time (ledger id as tiebreak), so the listing
    /// order is stable across calls. Never fails for a valid account - an
    /// empty collection is an empty list.
    pub async fn list_owned(&self, account_id: &str) -> DbResult<Vec<OwnedCard>> {
        let owned = sqlx::query_as::<_, OwnedCard>(
            r#"
            SELECT
                c.id, c.name, c.element, c.power, c.ability,
                c.price_cents, c.rarity, c.image_url, c.collector_number,
                c.created_at,
                o.acquired_at
            FROM ownerships o
            INNER JOIN cards c ON c.id = o.card_id
            WHERE o.account_id = ?1
            ORDER BY o.acquired_at, o.id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(owned)
    }

    /// Counts the account's ledger rows.
    pub async fn count_owned(&self, account_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ownerships WHERE account_id = ?1")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Checks whether the account owns a specific card.
    pub async fn owns(&self, account_id: &str, card_id: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ownerships WHERE account_id = ?1 AND card_id = ?2",
        )
        .bind(account_id)
        .bind(card_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Grants a card to an account (the admin grant path).
    ///
    /// The purchase engine writes its own ledger rows inside the purchase
    /// transaction; this method covers direct grants.
    ///
    /// ## Errors
    /// * `AlreadyOwned` - a ledger row for (account, card) already exists
    pub async fn grant(&self, account_id: &str, card_id: &str) -> StoreResult<Ownership> {
        debug!(account_id = %account_id, card_id = %card_id, "Granting card");

        let mut tx = self.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ownerships WHERE account_id = ?1 AND card_id = ?2",
        )
        .bind(account_id)
        .bind(card_id)
        .fetch_one(&mut *tx)
        .await?;

        if existing > 0 {
            return Err(CoreError::AlreadyOwned {
                card_id: card_id.to_string(),
            }
            .into());
        }

        let ownership = Ownership {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            card_id: card_id.to_string(),
            acquired_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO ownerships (id, account_id, card_id, acquired_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&ownership.id)
        .bind(&ownership.account_id)
        .bind(&ownership.card_id)
        .bind(ownership.acquired_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ownership)
    }

    /// Revokes a card from an account's collection.
    ///
    /// ## Errors
    /// * `NotOwned` - no ledger row exists for (account, card)
    pub async fn revoke(&self, account_id: &str, card_id: &str) -> StoreResult<()> {
        debug!(account_id = %account_id, card_id = %card_id, "Revoking card");

        let result =
            sqlx::query("DELETE FROM ownerships WHERE account_id = ?1 AND card_id = ?2")
                .bind(account_id)
                .bind(card_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotOwned {
                card_id: card_id.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};
    use crate::repository::card::generate_card_id;
    use cardex_core::{Account, Card, Rarity};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_account(db: &Database) -> String {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: "Avery".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "$argon2id$stub".to_string(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        };
        db.accounts().insert(&account).await.unwrap();
        account.id
    }

    async fn seed_card(db: &Database, number: i64) -> Card {
        let card = Card {
            id: generate_card_id(),
            name: format!("Card {}", number),
            element: "Water".to_string(),
            power: 80,
            ability: "Test".to_string(),
            price_cents: 1999,
            rarity: Rarity::Common,
            image_url: "https://cards.example.com/art/x.png".to_string(),
            collector_number: number,
            created_at: Utc::now(),
        };
        db.cards().insert(&card).await.unwrap();
        card
    }

    #[tokio::test]
    async fn test_grant_and_list() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;
        let card = seed_card(&db, 1).await;

        let ownership = db.ownerships().grant(&account_id, &card.id).await.unwrap();
        assert_eq!(ownership.account_id, account_id);

        let owned = db.ownerships().list_owned(&account_id).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].card.id, card.id);
        // The ledger assigned the timestamp, not the caller.
        let age = (Utc::now() - owned[0].acquired_at).num_seconds();
        assert!((0..60).contains(&age));

        assert_eq!(db.ownerships().count_owned(&account_id).await.unwrap(), 1);
        assert!(db.ownerships().owns(&account_id, &card.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_twice_rejected() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;
        let card = seed_card(&db, 1).await;

        db.ownerships().grant(&account_id, &card.id).await.unwrap();

        let err = db
            .ownerships()
            .grant(&account_id, &card.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Rule(CoreError::AlreadyOwned { .. })
        ));

        // Still exactly one ledger row.
        assert_eq!(db.ownerships().count_owned(&account_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_revoke() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;
        let card = seed_card(&db, 1).await;

        db.ownerships().grant(&account_id, &card.id).await.unwrap();
        db.ownerships().revoke(&account_id, &card.id).await.unwrap();

        assert_eq!(db.ownerships().count_owned(&account_id).await.unwrap(), 0);

        let err = db
            .ownerships()
            .revoke(&account_id, &card.id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rule(CoreError::NotOwned { .. })));
    }

    #[tokio::test]
    async fn test_listing_is_acquisition_ordered() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;
        let first = seed_card(&db, 1).await;
        let second = seed_card(&db, 2).await;

        db.ownerships().grant(&account_id, &first.id).await.unwrap();
        db.ownerships()
            .grant(&account_id, &second.id)
            .await
            .unwrap();

        let owned = db.ownerships().list_owned(&account_id).await.unwrap();
        let ids: Vec<&str> = owned.iter().map(|o| o.card.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str()]);
    }
}
