//! # Card Repository
//!
//! Database operations for the card catalog.
//!
//! Catalog records are immutable after creation: the repository exposes
//! reads, inserts for the seed path, and a wholesale `delete_all` used by
//! the admin-style reseed. There is no per-card update.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use cardex_core::Card;

/// Column list shared by every card SELECT.
const CARD_COLUMNS: &str = r#"
    id, name, element, power, ability,
    price_cents, rarity, image_url, collector_number, created_at
"#;

/// Repository for card catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CardRepository::new(pool);
///
/// let catalog = repo.list_all().await?;
/// let card = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct CardRepository {
    pool: SqlitePool,
}

impl CardRepository {
    /// Creates a new CardRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CardRepository { pool }
    }

    /// Lists the full catalog, ordered by collector number.
    pub async fn list_all(&self) -> DbResult<Vec<Card>> {
        let cards = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards ORDER BY collector_number"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Gets a card by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Card))` - Card found
    /// * `Ok(None)` - Card not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Card>> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Gets a card by its collector number (the natural key).
    pub async fn get_by_collector_number(&self, number: i64) -> DbResult<Option<Card>> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE collector_number = ?1"
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Inserts a new card.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Collector number already exists
    pub async fn insert(&self, card: &Card) -> DbResult<()> {
        debug!(id = %card.id, collector_number = %card.collector_number, "Inserting card");

        sqlx::query(
            r#"
            INSERT INTO cards (
                id, name, element, power, ability,
                price_cents, rarity, image_url, collector_number, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&card.id)
        .bind(&card.name)
        .bind(&card.element)
        .bind(card.power)
        .bind(&card.ability)
        .bind(card.price_cents)
        .bind(card.rarity)
        .bind(&card.image_url)
        .bind(card.collector_number)
        .bind(card.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes every card in the catalog.
    ///
    /// Only the reseed path calls this. Ownership and cart rows referencing
    /// the removed cards are left in place; the purchase engine skips any
    /// that turn out to be dangling.
    ///
    /// ## Returns
    /// Number of cards deleted.
    pub async fn delete_all(&self) -> DbResult<u64> {
        debug!("Deleting all catalog cards");

        let result = sqlx::query("DELETE FROM cards").execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Counts total cards (for diagnostics and the seed guard).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cards")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new card ID.
pub fn generate_card_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use cardex_core::Rarity;
    use chrono::Utc;

    fn test_card(number: i64, price_cents: i64) -> Card {
        Card {
            id: generate_card_id(),
            name: format!("Card {}", number),
            element: "Fire".to_string(),
            power: 100,
            ability: "Test Ability".to_string(),
            price_cents,
            rarity: Rarity::Rare,
            image_url: format!("https://cards.example.com/art/{}.png", number),
            collector_number: number,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_ordering() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // Insert out of collector order.
        db.cards().insert(&test_card(3, 1999)).await.unwrap();
        db.cards().insert(&test_card(1, 2999)).await.unwrap();
        db.cards().insert(&test_card(2, 999)).await.unwrap();

        let catalog = db.cards().list_all().await.unwrap();
        let numbers: Vec<i64> = catalog.iter().map(|c| c.collector_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_get_by_id_and_natural_key() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let card = test_card(7, 1299);
        db.cards().insert(&card).await.unwrap();

        let by_id = db.cards().get_by_id(&card.id).await.unwrap().unwrap();
        assert_eq!(by_id.rarity, Rarity::Rare);
        assert_eq!(by_id.price_cents, 1299);

        let by_number = db
            .cards()
            .get_by_collector_number(7)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_number.id, card.id);

        assert!(db.cards().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reseed_wipes_catalog() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.cards().insert(&test_card(1, 999)).await.unwrap();
        db.cards().insert(&test_card(2, 999)).await.unwrap();

        let deleted = db.cards().delete_all().await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(db.cards().count().await.unwrap(), 0);
    }
}
