//! # Error Types
//!
//! Domain-specific error types for cardex-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cardex-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule rejections                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cardex-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  cardex-market errors (separate crate)                                 │
//! │  └── ApiError         - What a transport layer sees (serialized)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (card id, limit, etc.)
//! 3. Errors are enum variants, never String
//! 4. Business rejections are surfaced to the caller as-is; they are never
//!    retried automatically

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business rule errors.
///
/// These errors represent business rule violations. They are final: a caller
/// receiving one of these must change its request, not retry it.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Account cannot be found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Card cannot be found in the catalog.
    ///
    /// ## When This Occurs
    /// - Card id doesn't exist in the catalog
    /// - Catalog was reseeded and the id is stale
    #[error("Card not found: {0}")]
    CardNotFound(String),

    /// Cart entry cannot be found for the calling account.
    #[error("Cart entry not found: {0}")]
    CartEntryNotFound(String),

    /// The account does not own the card it tried to release.
    #[error("Card not found in collection: {card_id}")]
    NotOwned { card_id: String },

    /// The account already owns this card.
    ///
    /// An account can never hold two copies of the same card, so an owned
    /// card cannot be staged or granted again.
    #[error("Card already owned: {card_id}")]
    AlreadyOwned { card_id: String },

    /// The card is already staged in the account's cart.
    #[error("Card already in cart: {card_id}")]
    DuplicateInCart { card_id: String },

    /// Holding limit reached: owned + staged cards would exceed the cap.
    ///
    /// ## When This Occurs
    /// - Adding to cart when `owned + staged` is already at the limit
    /// - Purchasing a cart whose size would push `owned` past the limit
    #[error("Holding limit reached: {held} of {limit} cards held")]
    LimitExceeded { held: i64, limit: i64 },

    /// Purchase attempted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Registration attempted with an email that is already registered.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Login failed.
    ///
    /// Deliberately identical for "unknown email" and "wrong password" so
    /// the error gives no oracle for probing registered emails.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Caller lacks the admin capability for this operation.
    #[error("Admin access required")]
    Forbidden,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed email, invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::LimitExceeded { held: 3, limit: 3 };
        assert_eq!(err.to_string(), "Holding limit reached: 3 of 3 cards held");

        let err = CoreError::AlreadyOwned {
            card_id: "card-1".to_string(),
        };
        assert_eq!(err.to_string(), "Card already owned: card-1");
    }

    #[test]
    fn test_invalid_credentials_is_uniform() {
        // The same variant (and therefore the same message) must cover both
        // unknown-email and wrong-password failures.
        let unknown_email = CoreError::InvalidCredentials;
        let wrong_password = CoreError::InvalidCredentials;
        assert_eq!(unknown_email.to_string(), wrong_password.to_string());
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        };
        assert_eq!(err.to_string(), "password must be at least 8 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "email".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
