//! # Capability Checks
//!
//! Admin authorization for privileged operations.
//!
//! The admin capability is a boolean flag on the account, checked
//! per-operation by a function - not a subclass or separate account type.
//! Every admin-gated service operation funnels through [`authorize`].

use crate::error::{CoreError, CoreResult};
use crate::types::Account;

/// Privileged operations that require the admin capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    /// List every account with owned-card counts.
    ListAccounts,
    /// Update another account's profile or password.
    UpdateAccount,
    /// Delete another account (cascades its ledger and cart rows).
    DeleteAccount,
    /// View another account's collection.
    ViewCollection,
    /// Grant a card directly into an account's collection.
    GrantCard,
}

/// Authorizes `caller` for a privileged operation.
///
/// All actions currently require the same capability (the admin flag); the
/// action parameter keeps call sites explicit about what they are gating.
///
/// ## Errors
/// `Forbidden` when the caller does not carry the admin flag.
pub fn authorize(caller: &Account, _action: AdminAction) -> CoreResult<()> {
    if caller.is_admin {
        Ok(())
    } else {
        Err(CoreError::Forbidden)
    }
}
