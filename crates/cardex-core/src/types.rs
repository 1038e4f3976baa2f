//! # Domain Types
//!
//! Core domain types used throughout Cardex.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Account      │   │      Card       │   │   Ownership     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  email (unique) │   │  collector_no.  │   │  account_id (FK)│       │
//! │  │  password_hash  │   │  name, element  │   │  card_id (FK)   │       │
//! │  │  is_admin       │   │  price_cents    │   │  acquired_at    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   CartEntry     │   │     Rarity      │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  id (UUID)      │   │  Common         │                             │
//! │  │  account_id (FK)│   │  Uncommon       │                             │
//! │  │  card_id (FK)   │   │  Rare           │                             │
//! │  │  added_at       │   │  Legendary      │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Cards have:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `collector_number`: human-readable natural key used for display ordering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Account
// =============================================================================

/// A registered user identity with credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unique email, stored exactly as supplied (no normalization).
    pub email: String,

    /// Argon2 hash of the password. The raw password is never persisted.
    pub password_hash: String,

    /// Admin capability flag, checked per-operation.
    pub is_admin: bool,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Safe projection of an [`Account`] for API responses.
///
/// Excludes the credential hash; this is the only account shape that should
/// ever leave the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountProfile {
    fn from(account: &Account) -> Self {
        AccountProfile {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            is_admin: account.is_admin,
            created_at: account.created_at,
        }
    }
}

/// Account listing row with the owned-card count, for the accounts overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub cards_owned: i64,
}

/// Partial update for an account, as accepted from callers.
///
/// ## Falsy-Skip Semantics
/// A field is applied only when it is `Some` AND non-empty. An explicit
/// empty string is treated the same as an absent field and leaves the stored
/// value untouched. This matches the historical behavior of the API and is
/// kept for compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl AccountUpdate {
    /// Returns `field` only when it carries a non-empty value.
    fn supplied(field: &Option<String>) -> Option<&str> {
        field.as_deref().filter(|v| !v.is_empty())
    }

    /// The name to apply, if supplied.
    pub fn name(&self) -> Option<&str> {
        Self::supplied(&self.name)
    }

    /// The email to apply, if supplied.
    pub fn email(&self) -> Option<&str> {
        Self::supplied(&self.email)
    }

    /// The raw password to hash and apply, if supplied.
    pub fn password(&self) -> Option<&str> {
        Self::supplied(&self.password)
    }

    /// True when no field carries an applicable value.
    pub fn is_empty(&self) -> bool {
        self.name().is_none() && self.email().is_none() && self.password().is_none()
    }
}

/// Resolved column changes for an account row.
///
/// Produced by the service layer from an [`AccountUpdate`] after the
/// falsy-skip filter and password hashing have been applied.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

// =============================================================================
// Rarity
// =============================================================================

/// Rarity tag of a catalog card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

// =============================================================================
// Card
// =============================================================================

/// A purchasable card definition in the catalog.
///
/// Immutable after creation; the only mutation path is an explicit catalog
/// reseed. Cards have an independent lifecycle and are never owned by the
/// catalog itself - ownership lives in [`Ownership`] rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Card {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Creature name shown in the catalog.
    pub name: String,

    /// Element tag (e.g., "Fire", "Storm/Frost").
    pub element: String,

    /// Power stat.
    pub power: i64,

    /// Signature ability text.
    pub ability: String,

    /// Price in cents (smallest currency unit). Never negative.
    pub price_cents: i64,

    /// Rarity tag.
    pub rarity: Rarity,

    /// URL of the card artwork.
    pub image_url: String,

    /// Collector number - natural key used for display ordering.
    pub collector_number: i64,

    /// When the card was created (seeded).
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A catalog card annotated with the calling account's ownership flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardWithOwnership {
    #[serde(flatten)]
    pub card: Card,

    /// Whether the calling account owns this card.
    pub is_owned: bool,
}

// =============================================================================
// Ownership
// =============================================================================

/// Record that a specific account holds a specific card.
///
/// At most one row exists per (account, card) pair. Created only by the
/// purchase engine or the admin grant path; timestamps are assigned by the
/// ledger, never by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Ownership {
    pub id: String,
    pub account_id: String,
    pub card_id: String,
    pub acquired_at: DateTime<Utc>,
}

/// A card in an account's collection, with its acquisition timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OwnedCard {
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub card: Card,

    /// When the account acquired the card.
    pub acquired_at: DateTime<Utc>,
}

// =============================================================================
// Cart
// =============================================================================

/// Record that a specific account has staged a specific card for purchase.
///
/// At most one row exists per (account, card) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartEntry {
    pub id: String,
    pub account_id: String,
    pub card_id: String,
    pub added_at: DateTime<Utc>,
}

/// A cart entry joined with its card, for cart listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Cart entry id (used for removal).
    pub entry_id: String,

    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    #[serde(flatten)]
    pub card: Card,

    /// When the card was staged.
    pub added_at: DateTime<Utc>,
}

// =============================================================================
// Purchase
// =============================================================================

/// Result of converting a cart into ownership rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    /// Names of the cards actually purchased, in processing order.
    pub purchased: Vec<String>,

    /// Sum of the purchased cards' prices, in cents.
    pub total_cents: i64,

    /// Number of cards actually transferred.
    pub count: usize,
}

impl PurchaseReceipt {
    /// Returns the total as a Money type.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account() -> Account {
        Account {
            id: "acct-1".to_string(),
            name: "Avery".to_string(),
            email: "avery@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            is_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_excludes_credentials() {
        let account = test_account();
        let profile = AccountProfile::from(&account);

        assert_eq!(profile.id, account.id);
        assert_eq!(profile.email, account.email);

        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_account_update_falsy_skip() {
        let update = AccountUpdate {
            name: Some(String::new()),
            email: Some("new@example.com".to_string()),
            password: None,
        };

        // Empty string behaves exactly like an absent field.
        assert_eq!(update.name(), None);
        assert_eq!(update.email(), Some("new@example.com"));
        assert_eq!(update.password(), None);
        assert!(!update.is_empty());

        let noop = AccountUpdate {
            name: Some(String::new()),
            email: Some(String::new()),
            password: Some(String::new()),
        };
        assert!(noop.is_empty());
    }

    #[test]
    fn test_rarity_serialization() {
        assert_eq!(
            serde_json::to_string(&Rarity::Legendary).unwrap(),
            "\"legendary\""
        );
        let parsed: Rarity = serde_json::from_str("\"rare\"").unwrap();
        assert_eq!(parsed, Rarity::Rare);
    }

    #[test]
    fn test_card_price() {
        let card = Card {
            id: "card-1".to_string(),
            name: "Emberwing Drake".to_string(),
            element: "Fire".to_string(),
            power: 120,
            ability: "Cinder Breath".to_string(),
            price_cents: 2999,
            rarity: Rarity::Legendary,
            image_url: "https://cards.example.com/art/1.png".to_string(),
            collector_number: 1,
            created_at: Utc::now(),
        };

        assert_eq!(card.price(), Money::from_cents(2999));
        assert_eq!(format!("{}", card.price()), "$29.99");
    }

    #[test]
    fn test_receipt_total() {
        let receipt = PurchaseReceipt {
            purchased: vec!["A".to_string(), "B".to_string()],
            total_cents: 3000,
            count: 2,
        };
        assert_eq!(receipt.total(), Money::from_cents(3000));
    }
}
