//! # API Error Type
//!
//! Unified error type for market service operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Cardex                                 │
//! │                                                                         │
//! │  Transport                   Service Layer                              │
//! │  ─────────                   ─────────────                              │
//! │                                                                         │
//! │  call add_to_cart                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Service Operation                                               │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Rule rejected? ──── CoreError::DuplicateInCart ───┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Storage failed? ─── DbError::QueryFailed ─────── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Business rejections keep their precise code (CONFLICT,                │
//! │  LIMIT_EXCEEDED, ...). Storage failures collapse to a generic          │
//! │  internal code - the unit of work has already rolled back.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use cardex_core::CoreError;
use cardex_db::{DbError, StoreError};

/// API error returned from service operations.
///
/// ## Serialization
/// This is what a transport layer forwards when an operation fails:
/// ```json
/// {
///   "code": "LIMIT_EXCEEDED",
///   "message": "Holding limit reached: 3 of 3 cards held"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Account, card, cart entry, or ownership missing (404)
    NotFound,

    /// Email taken, already owned, or duplicate in cart (409)
    Conflict,

    /// Holding-limit violation (422)
    LimitExceeded,

    /// Purchase attempted with an empty cart (422)
    EmptyCart,

    /// Missing, invalid, or expired token; bad credentials (401)
    Unauthenticated,

    /// Non-admin calling an admin-only operation (403)
    Forbidden,

    /// Input validation failed (400)
    ValidationError,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Conflict, message)
    }

    /// Creates an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthenticated, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts business rule errors to API errors.
///
/// Every variant keeps its precise code; the message is the error's own
/// display text so the caller-visible wording lives in one place.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::AccountNotFound(_)
            | CoreError::CardNotFound(_)
            | CoreError::CartEntryNotFound(_)
            | CoreError::NotOwned { .. } => ErrorCode::NotFound,

            CoreError::AlreadyOwned { .. }
            | CoreError::DuplicateInCart { .. }
            | CoreError::EmailTaken(_) => ErrorCode::Conflict,

            CoreError::LimitExceeded { .. } => ErrorCode::LimitExceeded,

            CoreError::EmptyCart => ErrorCode::EmptyCart,

            CoreError::InvalidCredentials => ErrorCode::Unauthenticated,

            CoreError::Forbidden => ErrorCode::Forbidden,

            CoreError::Validation(_) => ErrorCode::ValidationError,
        };

        ApiError::new(code, err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts checked-operation errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rule(core) => ApiError::from(core),
            StoreError::Db(db) => ApiError::from(db),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for service operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
