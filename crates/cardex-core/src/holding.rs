//! # Holding-Limit Rules
//!
//! The central invariant of the marketplace: for every account,
//! `owned + staged` cards may never exceed [`HOLDING_LIMIT`] at the moment
//! any add-to-cart or purchase operation completes.
//!
//! ## Where the Checks Run
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Holding-Limit Enforcement Points                        │
//! │                                                                         │
//! │  add_to_cart                         purchase                           │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  check_can_stage(owned, staged)     check_can_purchase(owned, cart)    │
//! │       │                                  │                              │
//! │       │  owned + staged >= 3?            │  owned + cart > 3?           │
//! │       │  → LimitExceeded                 │  → LimitExceeded             │
//! │       ▼                                  ▼                              │
//! │  insert cart row                    convert cart rows to ownership      │
//! │                                                                         │
//! │  Both checks run INSIDE the storage transaction, and same-account      │
//! │  calls are serialized by the service layer, so two concurrent          │
//! │  operations cannot both pass and jointly break the invariant.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note the asymmetry: staging uses `>=` against the pre-insert counts (one
//! more row is about to be added), purchasing uses `>` against the final
//! owned total (the cart rows become ownership rows, net zero new holdings).

use crate::error::{CoreError, CoreResult};
use crate::HOLDING_LIMIT;

/// Checks whether one more card may be staged into the cart.
///
/// ## Arguments
/// * `owned` - Current number of ownership rows for the account
/// * `staged` - Current number of cart rows for the account (pre-insert)
///
/// ## Errors
/// `LimitExceeded` when the account already holds `HOLDING_LIMIT` cards
/// across collection and cart.
pub fn check_can_stage(owned: i64, staged: i64) -> CoreResult<()> {
    let held = owned + staged;
    if held >= HOLDING_LIMIT {
        return Err(CoreError::LimitExceeded {
            held,
            limit: HOLDING_LIMIT,
        });
    }
    Ok(())
}

/// Checks whether an entire cart may be converted to ownership.
///
/// ## Arguments
/// * `owned` - Current number of ownership rows for the account
/// * `cart_len` - Number of cart rows about to be converted
///
/// ## Errors
/// `LimitExceeded` when the post-purchase owned total would exceed
/// `HOLDING_LIMIT`. A cart that lands exactly on the limit is allowed.
pub fn check_can_purchase(owned: i64, cart_len: i64) -> CoreResult<()> {
    let held = owned + cart_len;
    if held > HOLDING_LIMIT {
        return Err(CoreError::LimitExceeded {
            held,
            limit: HOLDING_LIMIT,
        });
    }
    Ok(())
}

/// Number of additional cards the account can still stage or acquire.
pub fn remaining_capacity(owned: i64, staged: i64) -> i64 {
    (HOLDING_LIMIT - owned - staged).max(0)
}

// =============================================================================
// Unit Tests
// =============================================================================
