//! # cardex-db: Database Layer for Cardex
//!
//! This crate provides database access for the Cardex marketplace.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cardex Data Flow                                │
//! │                                                                         │
//! │  Service operation (add_to_cart, purchase_cart, ...)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cardex-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ account, card │    │  (embedded)  │  │   │
//! │  │   │               │    │ ownership,    │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ cart,         │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ purchase      │    │              │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: for tests)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (account, card, ownership,
//!   cart, purchase)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cardex_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/cardex.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let cards = db.cards().list_all().await?;
//! let receipt = db.purchases().purchase(&account_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::AccountRepository;
pub use repository::card::CardRepository;
pub use repository::cart::CartRepository;
pub use repository::ownership::OwnershipRepository;
pub use repository::purchase::PurchaseEngine;
