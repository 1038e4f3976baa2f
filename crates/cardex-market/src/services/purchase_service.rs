//! Purchase service implementation.
//!
//! The caller-facing wrapper around the purchase engine. Holds the
//! per-account lock across the purchase transaction so a concurrent
//! add-to-cart or second purchase cannot interleave with it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::ApiResult;
use crate::MarketState;
use cardex_core::{Account, PurchaseReceipt};

/// Purchase service implementation.
pub struct PurchaseService {
    state: Arc<MarketState>,
}

impl PurchaseService {
    /// Create a new purchase service.
    pub fn new(state: Arc<MarketState>) -> Self {
        PurchaseService { state }
    }

    /// Purchase everything in the caller's cart.
    ///
    /// ## Errors
    /// * `EmptyCart` - nothing staged
    /// * `LimitExceeded` - cart plus collection would pass the holding limit
    pub async fn purchase(&self, caller: &Account) -> ApiResult<PurchaseReceipt> {
        debug!(account_id = %caller.id, "purchase_cart");

        let lock = self.state.locks.for_account(&caller.id);
        let _guard = lock.lock().await;

        let receipt = self.state.db.purchases().purchase(&caller.id).await?;

        info!(
            account_id = %caller.id,
            count = receipt.count,
            total_cents = receipt.total_cents,
            "Purchase completed"
        );

        Ok(receipt)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::account_service::AccountService;
    use crate::services::cart_service::CartService;
    use crate::services::collection_service::CollectionService;
    use crate::MarketConfig;
    use cardex_core::{Card, Rarity};
    use cardex_db::{Database, DbConfig};
    use chrono::Utc;
    use uuid::Uuid;

    async fn test_state() -> Arc<MarketState> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        MarketState::with_database(MarketConfig::for_tests(), db)
    }

    async fn seed_card(state: &MarketState, number: i64, name: &str, price_cents: i64) -> Card {
        let card = Card {
            id: Uuid::new_v4().to_string(),
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
        state.db.cards().insert(&card).await.unwrap();
        card
    }

    async fn registered_account(state: Arc<MarketState>, email: &str) -> Account {
        let accounts = AccountService::new(state.clone());
        let profile = accounts
            .register("Tester", email, "hunter2hunter2")
            .await
            .unwrap();
        state
            .db
            .accounts()
            .get_by_id(&profile.id)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_cart_to_collection_flow() {
        let state = test_state().await;
        let caller = registered_account(state.clone(), "avery@example.com").await;
        let cart = CartService::new(state.clone());
        let purchases = PurchaseService::new(state.clone());
        let collection = CollectionService::new(state.clone());

        let a = seed_card(&state, 1, "Emberwing Drake", 1000).await;
        let b = seed_card(&state, 2, "Static Vole", 2000).await;
        cart.add(&caller, &a.id).await.unwrap();
        cart.add(&caller, &b.id).await.unwrap();

        let receipt = purchases.purchase(&caller).await.unwrap();
        assert_eq!(receipt.purchased, vec!["Emberwing Drake", "Static Vole"]);
        assert_eq!(receipt.total_cents, 3000);
        assert_eq!(receipt.count, 2);

        let owned = collection.list_owned(&caller).await.unwrap();
        assert_eq!(owned.len(), 2);
        assert!(cart.list(&caller).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_purchase() {
        let state = test_state().await;
        let caller = registered_account(state.clone(), "avery@example.com").await;
        let purchases = PurchaseService::new(state);

        let err = purchases.purchase(&caller).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
    }

    #[tokio::test]
    async fn test_purchase_then_rebuy_is_blocked() {
        let state = test_state().await;
        let caller = registered_account(state.clone(), "avery@example.com").await;
        let cart = CartService::new(state.clone());
        let purchases = PurchaseService::new(state.clone());

        let card = seed_card(&state, 1, "Emberwing Drake", 1000).await;
        cart.add(&caller, &card.id).await.unwrap();
        purchases.purchase(&caller).await.unwrap();

        // A purchased card cannot be staged again.
        let err = cart.add(&caller, &card.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_double_purchase_second_sees_empty_cart() {
        let state = test_state().await;
        let caller = registered_account(state.clone(), "avery@example.com").await;
        let cart = CartService::new(state.clone());

        let card = seed_card(&state, 1, "Emberwing Drake", 1000).await;
        cart.add(&caller, &card.id).await.unwrap();

        // Two concurrent purchases of the same cart: one converts the cart,
        // the other finds it empty. Never a double conversion.
        let p1 = PurchaseService::new(state.clone());
        let p2 = PurchaseService::new(state.clone());
        let c1 = caller.clone();
        let c2 = caller.clone();

        let (res1, res2) = tokio::join!(
            async move { p1.purchase(&c1).await },
            async move { p2.purchase(&c2).await },
        );

        assert!(res1.is_ok() != res2.is_ok());
        let failure = if res1.is_err() {
            res1.unwrap_err()
        } else {
            res2.unwrap_err()
        };
        assert_eq!(failure.code, ErrorCode::EmptyCart);

        assert_eq!(state.db.ownerships().count_owned(&caller.id).await.unwrap(), 1);
    }
}
