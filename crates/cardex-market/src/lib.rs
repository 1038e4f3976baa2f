//! # Cardex Market
//!
//! The operation surface of the Cardex marketplace.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Market Services                                  │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │ AccountService │  │ CatalogService │  │ CollectionService          ││
//! │  │                │  │                │  │                            ││
//! │  │ • register     │  │ • list_cards   │  │ • list_owned               ││
//! │  │ • login        │  │ • get_card     │  │ • remove_owned             ││
//! │  │ • authenticate │  │   (owned flag  │  │ • admin_grant              ││
//! │  │ • profile CRUD │  │    per caller) │  │                            ││
//! │  │ • admin ops    │  │                │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │  CartService   │  │PurchaseService │                                │
//! │  │                │  │                │                                │
//! │  │ • list         │  │ • purchase     │                                │
//! │  │ • add (locked) │  │   (locked)     │                                │
//! │  │ • remove/clear │  │                │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │  cardex-db   │  │  JWT Auth    │  │  AccountLocks            ││  │
//! │  │  │  (SQLite)    │  │  (tokens)    │  │  (same-account           ││  │
//! │  │  │              │  │              │  │   serialization)         ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A transport layer (HTTP, gRPC, anything) wraps these services one-to-one:
//! authenticate the request with [`services::account_service::AccountService::authenticate`],
//! then call the matching operation with the resolved account.
//!
//! ## Configuration
//! Environment variables (see [`config::MarketConfig`]):
//! - `CARDEX_DATABASE_PATH` - SQLite database file path
//! - `CARDEX_JWT_SECRET` - Secret for JWT signing
//! - `CARDEX_TOKEN_LIFETIME_SECS` - Token lifetime (default: 3600)

pub mod auth;
pub mod config;
pub mod error;
pub mod locks;
pub mod password;
pub mod services;
pub mod telemetry;

// Re-exports
pub use config::MarketConfig;
pub use error::{ApiError, ApiResult, ErrorCode};

use std::sync::Arc;

use crate::auth::JwtManager;
use crate::locks::AccountLocks;
use cardex_db::{Database, DbConfig};

/// Shared application state.
///
/// Built once at startup and handed to every service as an `Arc`.
pub struct MarketState {
    pub db: Database,
    pub jwt: JwtManager,
    pub locks: AccountLocks,
    pub config: MarketConfig,
}

impl MarketState {
    /// Connects the database and assembles the shared state.
    pub async fn new(config: MarketConfig) -> ApiResult<Arc<Self>> {
        let db = Database::new(DbConfig::new(&config.database_path)).await?;
        Ok(Self::with_database(config, db))
    }

    /// Assembles state around an existing database handle.
    ///
    /// Used by tests with an in-memory database.
    pub fn with_database(config: MarketConfig, db: Database) -> Arc<Self> {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.token_lifetime_secs);
        Arc::new(MarketState {
            db,
            jwt,
            locks: AccountLocks::new(),
            config,
        })
    }
}
