//! # Per-Account Locks
//!
//! Serializes same-account cart and purchase operations.
//!
//! ## Why This Exists
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              The read-then-write race this prevents                     │
//! │                                                                         │
//! │  Without the lock, two concurrent calls for the SAME account:          │
//! │                                                                         │
//! │  add_to_cart (call A)              add_to_cart (call B)                 │
//! │  ──────────────────────            ──────────────────────               │
//! │  read counts: 2 held                                                    │
//! │                                    read counts: 2 held                  │
//! │  check passes (2 < 3)              check passes (2 < 3)                 │
//! │  insert row → 3 held                                                    │
//! │                                    insert row → 4 held  ❌ INVARIANT    │
//! │                                                         BROKEN          │
//! │                                                                         │
//! │  With the lock, call B waits for call A's transaction to commit and    │
//! │  then observes 3 held → LimitExceeded. Different accounts never        │
//! │  contend: each account id has its own mutex.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lock acquisition order is always: account lock first, then the database
//! transaction. Operations for different accounts proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;

/// A map of per-account async mutexes.
///
/// The outer `std::sync::Mutex` only guards the map itself and is held for
/// a few instructions; the inner `tokio::sync::Mutex` is held across the
/// whole unit of work and must therefore be the async flavor.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    /// Creates an empty lock map.
    pub fn new() -> Self {
        AccountLocks {
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Returns the lock for an account, creating it on first use.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let lock = state.locks.for_account(&account_id);
    /// let _guard = lock.lock().await;
    /// // ... checked cart/purchase operation ...
    /// ```
    pub fn for_account(&self, account_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("account lock map poisoned");
        locks
            .entry(account_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the lock entry for an account (after account deletion).
    ///
    /// Outstanding guards keep their `Arc` alive; this only stops the map
    /// from growing without bound.
    pub fn release_account(&self, account_id: &str) {
        let mut locks = self.locks.lock().expect("account lock map poisoned");
        locks.remove(account_id);
    }
}
