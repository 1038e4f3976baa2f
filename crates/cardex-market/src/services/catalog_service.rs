//! Catalog service implementation.
//!
//! Read-only catalog browsing, annotated per caller with ownership flags.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::ApiResult;
use crate::MarketState;
use cardex_core::{Account, Card, CardWithOwnership, CoreError};

/// Catalog service implementation.
pub struct CatalogService {
    state: Arc<MarketState>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(state: Arc<MarketState>) -> Self {
        CatalogService { state }
    }

    /// List the full catalog with the caller's ownership flags.
    ///
    /// Cards come back in collector-number order; each carries `is_owned`
    /// for the calling account.
    pub async fn list_cards(&self, caller: &Account) -> ApiResult<Vec<CardWithOwnership>> {
        debug!(account_id = %caller.id, "Listing catalog");

        let cards = self.state.db.cards().list_all().await?;

        let owned_ids: HashSet<String> = self
            .state
            .db
            .ownerships()
            .list_owned(&caller.id)
            .await?
            .into_iter()
            .map(|owned| owned.card.id)
            .collect();

        Ok(cards
            .into_iter()
            .map(|card| {
                let is_owned = owned_ids.contains(&card.id);
                CardWithOwnership { card, is_owned }
            })
            .collect())
    }

    /// Get a single card by id.
    pub async fn get_card(&self, card_id: &str) -> ApiResult<Card> {
        self.state
            .db
            .cards()
            .get_by_id(card_id)
            .await?
            .ok_or_else(|| CoreError::CardNotFound(card_id.to_string()).into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
