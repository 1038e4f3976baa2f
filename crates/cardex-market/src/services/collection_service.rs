//! Collection service implementation.
//!
//! The caller-facing view of the ownership ledger: list the collection,
//! release a card (making room under the holding limit), and the admin
//! grant path.

use std::sync::Arc;

use tracing::info;

use crate::error::ApiResult;
use crate::MarketState;
use cardex_core::capability::{authorize, AdminAction};
use cardex_core::{Account, CoreError, OwnedCard, Ownership};

/// Collection service implementation.
pub struct CollectionService {
    state: Arc<MarketState>,
}

impl CollectionService {
    /// Create a new collection service.
    pub fn new(state: Arc<MarketState>) -> Self {
        CollectionService { state }
    }

    /// List the caller's collection with acquisition timestamps.
    pub async fn list_owned(&self, caller: &Account) -> ApiResult<Vec<OwnedCard>> {
        Ok(self.state.db.ownerships().list_owned(&caller.id).await?)
    }

    /// Remove a card from the caller's collection.
    ///
    /// Frees a holding-limit slot for future staging and purchase.
    ///
    /// ## Errors
    /// * `NotFound` (`NotOwned`) - the caller does not own this card
    pub async fn remove_owned(&self, caller: &Account, card_id: &str) -> ApiResult<()> {
        self.state.db.ownerships().revoke(&caller.id, card_id).await?;

        info!(account_id = %caller.id, card_id = %card_id, "Card removed from collection");
        Ok(())
    }

    /// Grant a card directly into another account's collection.
    ///
    /// The admin-side counterpart of a purchase: creates the ledger row
    /// without touching any cart.
    ///
    /// ## Errors
    /// * `Forbidden` - caller lacks the admin capability
    /// * `NotFound` - target account or card missing
    /// * `Conflict` (`AlreadyOwned`) - the target already owns the card
    pub async fn admin_grant(
        &self,
        caller: &Account,
        target_id: &str,
        card_id: &str,
    ) -> ApiResult<Ownership> {
        authorize(caller, AdminAction::GrantCard)?;

        if self.state.db.accounts().get_by_id(target_id).await?.is_none() {
            return Err(CoreError::AccountNotFound(target_id.to_string()).into());
        }
        if self.state.db.cards().get_by_id(card_id).await?.is_none() {
            return Err(CoreError::CardNotFound(card_id.to_string()).into());
        }

        let ownership = self.state.db.ownerships().grant(target_id, card_id).await?;

        info!(
            admin_id = %caller.id,
            target_id = %target_id,
            card_id = %card_id,
            "Card granted by admin"
        );

        Ok(ownership)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
