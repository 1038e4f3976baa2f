//! Market service implementations.
//!
//! Each service owns one slice of the operation surface and holds the shared
//! [`crate::MarketState`]. A transport layer wraps these one-to-one:
//!
//! | Service                                   | Operations                                      |
//! |-------------------------------------------|-------------------------------------------------|
//! | [`account_service::AccountService`]       | register, login, authenticate, profile, admin   |
//! | [`catalog_service::CatalogService`]       | list catalog (owned-flag annotated), get card   |
//! | [`collection_service::CollectionService`] | list owned, remove owned, admin grant           |
//! | [`cart_service::CartService`]             | list, add, remove, clear                        |
//! | [`purchase_service::PurchaseService`]     | purchase                                        |
//!
//! Callers authenticate once per request
//! ([`account_service::AccountService::authenticate`]) and pass the resolved
//! account into the operation.

pub mod account_service;
pub mod cart_service;
pub mod catalog_service;
pub mod collection_service;
pub mod purchase_service;
