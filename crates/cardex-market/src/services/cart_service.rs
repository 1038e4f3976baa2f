//! Cart service implementation.
//!
//! Staging operations on top of the cart repository. The add path takes the
//! caller's account lock so two simultaneous adds cannot both pass the
//! holding-limit check.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::ApiResult;
use crate::MarketState;
use cardex_core::{Account, CartEntry, CartLine};

/// Cart service implementation.
pub struct CartService {
    state: Arc<MarketState>,
}

impl CartService {
    /// Create a new cart service.
    pub fn new(state: Arc<MarketState>) -> Self {
        CartService { state }
    }

    /// List the caller's cart in staging order.
    pub async fn list(&self, caller: &Account) -> ApiResult<Vec<CartLine>> {
        Ok(self.state.db.cart().list(&caller.id).await?)
    }

    /// Stage a card into the caller's cart.
    ///
    /// Serialized per account: the lock is held across the checked insert so
    /// concurrent adds for the same account observe each other's commits.
    ///
    /// ## Errors
    /// In precedence order: `NotFound` (card), `Conflict` (already owned),
    /// `LimitExceeded`, `Conflict` (duplicate in cart).
    pub async fn add(&self, caller: &Account, card_id: &str) -> ApiResult<CartEntry> {
        debug!(account_id = %caller.id, card_id = %card_id, "add_to_cart");

        let lock = self.state.locks.for_account(&caller.id);
        let _guard = lock.lock().await;

        let entry = self.state.db.cart().add(&caller.id, card_id).await?;

        info!(account_id = %caller.id, card_id = %card_id, "Card staged");
        Ok(entry)
    }

    /// Remove a single entry from the caller's cart.
    ///
    /// ## Errors
    /// * `NotFound` - no matching entry in the caller's cart
    pub async fn remove(&self, caller: &Account, entry_id: &str) -> ApiResult<()> {
        self.state.db.cart().remove(&caller.id, entry_id).await?;

        info!(account_id = %caller.id, entry_id = %entry_id, "Cart entry removed");
        Ok(())
    }

    /// Clear the caller's cart. Idempotent.
    ///
    /// ## Returns
    /// Number of entries removed.
    pub async fn clear(&self, caller: &Account) -> ApiResult<u64> {
        let removed = self.state.db.cart().clear(&caller.id).await?;

        info!(account_id = %caller.id, removed = removed, "Cart cleared");
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
