//! # Repository Module
//!
//! Database repository implementations for Cardex.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service operation                                                     │
//! │       │                                                                 │
//! │       │  db.cart().add(&account_id, &card_id)                          │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CartRepository                                                        │
//! │  ├── list(&self, account_id)                                           │
//! │  ├── add(&self, account_id, card_id)     ← checked, transactional      │
//! │  ├── remove(&self, account_id, entry_id)                               │
//! │  └── clear(&self, account_id)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • SQL is isolated in one place                                        │
//! │  • Rule checks run inside the same transaction as the writes           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`account::AccountRepository`] - Account CRUD and cascade delete
//! - [`card::CardRepository`] - Catalog reads and reseed
//! - [`ownership::OwnershipRepository`] - The per-account ownership ledger
//! - [`cart::CartRepository`] - Cart staging with rule enforcement
//! - [`purchase::PurchaseEngine`] - Atomic cart-to-ownership conversion

pub mod account;
pub mod card;
pub mod cart;
pub mod ownership;
pub mod purchase;
