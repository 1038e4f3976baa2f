//! # Purchase Engine
//!
//! Atomic conversion of an account's cart into ownership ledger rows.
//!
//! ## Purchase Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  purchase(account) - one transaction                    │
//! │                                                                         │
//! │  1. LOAD      cart entries, in staging order (added_at, id)            │
//! │       │       none? → EmptyCart                                        │
//! │       ▼                                                                 │
//! │  2. VALIDATE  owned + |cart| > 3 → LimitExceeded                       │
//! │       │       (pre-purchase sizes; see note below)                     │
//! │       ▼                                                                 │
//! │  3. CONVERT   for each entry, in load order:                           │
//! │       │         resolve card                                           │
//! │       │         ├── found: INSERT ownership row                        │
//! │       │         │          DELETE cart entry                           │
//! │       │         │          total += price; purchased += name           │
//! │       │         └── missing: skip entry (warn!), keep going            │
//! │       ▼                                                                 │
//! │  4. COMMIT    all inserts and deletes land together, or none do        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. RECEIPT   purchased names, total cents, transferred count          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The limit check uses the pre-purchase cart size. When step 3 skips a
//! dangling entry (its card vanished in a catalog reseed), fewer cards than
//! validated are transferred; the skipped entry is neither charged nor
//! counted, and the skip is surfaced as a `warn!` event.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StoreResult;
use cardex_core::{holding, Card, CartEntry, CoreError, Money, PurchaseReceipt};

/// The purchase engine: validates and converts cart contents into ledger
/// rows under the holding-limit rule.
#[derive(Debug, Clone)]
pub struct PurchaseEngine {
    pool: SqlitePool,
}

impl PurchaseEngine {
    /// Creates a new PurchaseEngine.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseEngine { pool }
    }

    /// Purchases everything in the account's cart.
    ///
    /// The whole operation is one unit of work: on any storage failure no
    /// partial ownership or cart mutation is visible afterwards.
    ///
    /// ## Errors
    /// * `EmptyCart` - the account has nothing staged
    /// * `LimitExceeded` - owned + cart size would pass the holding limit
    pub async fn purchase(&self, account_id: &str) -> StoreResult<PurchaseReceipt> {
        debug!(account_id = %account_id, "Processing purchase");

        let mut tx = self.pool.begin().await?;

        // 1. Load the cart in staging order. This is the processing order.
        let entries = sqlx::query_as::<_, CartEntry>(
            r#"
            SELECT id, account_id, card_id, added_at
            FROM cart_entries
            WHERE account_id = ?1
            ORDER BY added_at, id
            "#,
        )
        .bind(account_id)
        .fetch_all(&mut *tx)
        .await?;

        if entries.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }

        // 2. Holding limit against the pre-purchase sizes.
        let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ownerships WHERE account_id = ?1")
            .bind(account_id)
            .fetch_one(&mut *tx)
            .await?;

        holding::check_can_purchase(owned, entries.len() as i64)?;

        // 3. Convert each entry. A dangling card reference is skipped, not
        //    fatal: the rest of the cart still goes through.
        let mut total = Money::zero();
        let mut purchased: Vec<String> = Vec::with_capacity(entries.len());
        let now = Utc::now();

        for entry in &entries {
            let card = sqlx::query_as::<_, Card>(
                r#"
                SELECT
                    id, name, element, power, ability,
                    price_cents, rarity, image_url, collector_number, created_at
                FROM cards
                WHERE id = ?1
                "#,
            )
            .bind(&entry.card_id)
            .fetch_optional(&mut *tx)
            .await?;

            let card = match card {
                Some(card) => card,
                None => {
                    warn!(
                        account_id = %account_id,
                        entry_id = %entry.id,
                        card_id = %entry.card_id,
                        "Cart entry references a missing card; skipping"
                    );
                    continue;
                }
            };

            sqlx::query(
                r#"
                INSERT INTO ownerships (id, account_id, card_id, acquired_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(account_id)
            .bind(&card.id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM cart_entries WHERE id = ?1")
                .bind(&entry.id)
                .execute(&mut *tx)
                .await?;

            total += card.price();
            purchased.push(card.name);
        }

        // 4. All ownership inserts and cart deletes land as one unit.
        tx.commit().await?;

        let count = purchased.len();
        info!(
            account_id = %account_id,
            count = count,
            total = %total,
            "Purchase completed"
        );

        Ok(PurchaseReceipt {
            purchased,
            total_cents: total.cents(),
            count,
        })
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
    use cardex_core::{Account, Rarity, HOLDING_LIMIT};

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

    async fn seed_card(db: &Database, number: i64, name: &str, price_cents: i64) -> Card {
        let card = Card {
            id: generate_card_id(),
            name: name.to_string(),
            element: "Fire".to_string(),
            power: 100,
            ability: "Test".to_string(),
            price_cents,
            rarity: Rarity::Rare,
            image_url: "https://cards.example.com/art/x.png".to_string(),
            collector_number: number,
            created_at: Utc::now(),
        };
        db.cards().insert(&card).await.unwrap();
        card
    }

    /// Asserts the central invariant for an account.
    async fn assert_holding_invariant(db: &Database, account_id: &str) {
        let owned = db.ownerships().count_owned(account_id).await.unwrap();
        let staged = db.cart().count(account_id).await.unwrap();
        assert!(
            owned + staged <= HOLDING_LIMIT,
            "holding invariant violated: {} owned + {} staged",
            owned,
            staged
        );
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;

        let err = db.purchases().purchase(&account_id).await.unwrap_err();
        assert!(matches!(err, StoreError::Rule(CoreError::EmptyCart)));

        // Nothing was mutated.
        assert_eq!(db.ownerships().count_owned(&account_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_two_card_purchase_receipt() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;

        let a = seed_card(&db, 1, "Emberwing Drake", 1000).await; // $10.00
        let b = seed_card(&db, 2, "Static Vole", 2000).await; // $20.00

        db.cart().add(&account_id, &a.id).await.unwrap();
        db.cart().add(&account_id, &b.id).await.unwrap();

        let receipt = db.purchases().purchase(&account_id).await.unwrap();

        assert_eq!(
            receipt.purchased,
            vec!["Emberwing Drake".to_string(), "Static Vole".to_string()]
        );
        assert_eq!(receipt.total_cents, 3000);
        assert_eq!(receipt.count, 2);

        // Cart emptied, ledger holds exactly the two cards.
        assert_eq!(db.cart().count(&account_id).await.unwrap(), 0);
        let owned = db.ownerships().list_owned(&account_id).await.unwrap();
        let names: Vec<&str> = owned.iter().map(|o| o.card.name.as_str()).collect();
        assert_eq!(names, vec!["Emberwing Drake", "Static Vole"]);

        assert_holding_invariant(&db, &account_id).await;
    }

    #[tokio::test]
    async fn test_round_trip_single_card() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;
        let card = seed_card(&db, 1, "Tidehorn Leviathan", 1999).await;

        db.cart().add(&account_id, &card.id).await.unwrap();
        let receipt = db.purchases().purchase(&account_id).await.unwrap();
        assert_eq!(receipt.count, 1);

        // Exactly one ledger row for the card, zero cart rows remaining.
        assert!(db.ownerships().owns(&account_id, &card.id).await.unwrap());
        assert_eq!(db.ownerships().count_owned(&account_id).await.unwrap(), 1);
        assert_eq!(db.cart().count(&account_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purchase_at_the_boundary() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;

        // Own two cards already.
        for number in 1..=2 {
            let card = seed_card(&db, number, &format!("Owned {}", number), 500).await;
            db.ownerships().grant(&account_id, &card.id).await.unwrap();
        }

        // One card in the cart: 2 + 1 = 3, exactly at the limit.
        let third = seed_card(&db, 3, "Third", 500).await;
        db.cart().add(&account_id, &third.id).await.unwrap();

        let receipt = db.purchases().purchase(&account_id).await.unwrap();
        assert_eq!(receipt.count, 1);
        assert_eq!(db.ownerships().count_owned(&account_id).await.unwrap(), 3);

        assert_holding_invariant(&db, &account_id).await;
    }

    #[tokio::test]
    async fn test_purchase_over_the_limit_changes_nothing() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;

        // Own two cards, stage two more by bypassing the cart's own check
        // (direct inserts), so the purchase-side check is what trips.
        for number in 1..=2 {
            let card = seed_card(&db, number, &format!("Owned {}", number), 500).await;
            db.ownerships().grant(&account_id, &card.id).await.unwrap();
        }
        for number in 3..=4 {
            let card = seed_card(&db, number, &format!("Staged {}", number), 500).await;
            sqlx::query(
                "INSERT INTO cart_entries (id, account_id, card_id, added_at) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&account_id)
            .bind(&card.id)
            .bind(Utc::now())
            .execute(db.pool())
            .await
            .unwrap();
        }

        let err = db.purchases().purchase(&account_id).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Rule(CoreError::LimitExceeded { held: 4, limit: 3 })
        ));

        // Cart and ledger are both unchanged.
        assert_eq!(db.cart().count(&account_id).await.unwrap(), 2);
        assert_eq!(db.ownerships().count_owned(&account_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_dangling_card_reference_is_skipped() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;

        let kept = seed_card(&db, 1, "Kept", 1000).await;
        let doomed = seed_card(&db, 2, "Doomed", 2000).await;

        db.cart().add(&account_id, &kept.id).await.unwrap();
        db.cart().add(&account_id, &doomed.id).await.unwrap();

        // Simulate a reseed that removed one card behind the cart's back.
        sqlx::query("DELETE FROM cards WHERE id = ?1")
            .bind(&doomed.id)
            .execute(db.pool())
            .await
            .unwrap();

        let receipt = db.purchases().purchase(&account_id).await.unwrap();

        // The dangling entry is neither charged nor counted.
        assert_eq!(receipt.purchased, vec!["Kept".to_string()]);
        assert_eq!(receipt.total_cents, 1000);
        assert_eq!(receipt.count, 1);

        // The dangling cart entry is left behind, not converted.
        assert_eq!(db.cart().count(&account_id).await.unwrap(), 1);
        assert_eq!(db.ownerships().count_owned(&account_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purchase_processes_in_staging_order() {
        let db = test_db().await;
        let account_id = seed_account(&db).await;

        // Stage in a deliberate order unrelated to collector numbers.
        let c = seed_card(&db, 3, "Gamma", 100).await;
        let a = seed_card(&db, 1, "Alpha", 100).await;
        let b = seed_card(&db, 2, "Beta", 100).await;

        db.cart().add(&account_id, &c.id).await.unwrap();
        db.cart().add(&account_id, &a.id).await.unwrap();
        db.cart().add(&account_id, &b.id).await.unwrap();

        let receipt = db.purchases().purchase(&account_id).await.unwrap();
        assert_eq!(
            receipt.purchased,
            vec!["Gamma".to_string(), "Alpha".to_string(), "Beta".to_string()]
        );
    }
}
