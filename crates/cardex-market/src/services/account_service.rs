//! Account service implementation.
//!
//! Registration, login, token authentication, profile management, and the
//! admin-gated account operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::password::{hash_password, verify_password};
use crate::MarketState;
use cardex_core::capability::{authorize, AdminAction};
use cardex_core::validation::{validate_display_name, validate_email, validate_password};
use cardex_core::{
    Account, AccountPatch, AccountProfile, AccountSummary, AccountUpdate, CoreError, OwnedCard,
};
use cardex_db::repository::account::generate_account_id;

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed token for authenticated requests.
    pub access_token: String,

    /// Token type (for Authorization header construction).
    pub token_type: String,

    /// The authenticated account.
    pub account: AccountProfile,
}

/// Account service implementation.
pub struct AccountService {
    state: Arc<MarketState>,
}

impl AccountService {
    /// Create a new account service.
    pub fn new(state: Arc<MarketState>) -> Self {
        AccountService { state }
    }

    // =========================================================================
    // Registration & Login
    // =========================================================================

    /// Register a new account.
    ///
    /// The email must be unused (matched exactly as stored). The password is
    /// hashed before it touches the database; the raw value is never
    /// persisted.
    ///
    /// ## Errors
    /// * `ValidationError` - name/email/password fail shape checks
    /// * `Conflict` (`EmailTaken`) - email already registered
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResult<AccountProfile> {
        validate_display_name(name).map_err(CoreError::from)?;
        validate_email(email).map_err(CoreError::from)?;
        validate_password(password).map_err(CoreError::from)?;

        // Explicit pre-check for a friendly error; the UNIQUE index catches
        // the register/register race and surfaces as Conflict as well.
        if self.state.db.accounts().get_by_email(email).await?.is_some() {
            return Err(CoreError::EmailTaken(email.to_string()).into());
        }

        let now = chrono::Utc::now();
        let account = Account {
            id: generate_account_id(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            is_admin: false,
            created_at: now,
            updated_at: now,
        };

        self.state.db.accounts().insert(&account).await?;

        info!(account_id = %account.id, "Account registered");

        Ok(AccountProfile::from(&account))
    }

    /// Authenticate with email and password; issue a token on success.
    ///
    /// ## Errors
    /// * `Unauthenticated` (`InvalidCredentials`) - identical for an unknown
    ///   email and a wrong password; there is no oracle distinguishing them
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let account = match self.state.db.accounts().get_by_email(email).await? {
            Some(account) => account,
            None => {
                warn!("Login failed");
                return Err(CoreError::InvalidCredentials.into());
            }
        };

        if !verify_password(password, &account.password_hash) {
            warn!("Login failed");
            return Err(CoreError::InvalidCredentials.into());
        }

        let access_token = self.state.jwt.issue(&account.id)?;

        info!(account_id = %account.id, "Login successful");

        Ok(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
            account: AccountProfile::from(&account),
        })
    }

    /// Resolve a bearer token to its account.
    ///
    /// Every authenticated operation starts here.
    ///
    /// ## Errors
    /// * `Unauthenticated` - token missing/invalid/expired, or the account
    ///   it was issued for no longer exists
    pub async fn authenticate(&self, token: &str) -> ApiResult<Account> {
        let account_id = self.state.jwt.verify_account_id(token)?;

        self.state
            .db
            .accounts()
            .get_by_id(&account_id)
            .await?
            .ok_or_else(|| ApiError::unauthenticated("Account not found"))
    }

    // =========================================================================
    // Profile (self-scoped)
    // =========================================================================

    /// The caller's own profile.
    pub fn get_profile(&self, caller: &Account) -> AccountProfile {
        AccountProfile::from(caller)
    }

    /// Update the caller's own profile.
    ///
    /// Partial update with falsy-skip semantics: fields that are absent OR
    /// empty strings are left untouched.
    pub async fn update_profile(
        &self,
        caller: &Account,
        update: &AccountUpdate,
    ) -> ApiResult<AccountProfile> {
        self.apply_update(&caller.id, update).await?;

        let account = self
            .state
            .db
            .accounts()
            .get_by_id(&caller.id)
            .await?
            .ok_or_else(|| ApiError::not_found("Account", &caller.id))?;

        Ok(AccountProfile::from(&account))
    }

    /// Delete the caller's own account.
    ///
    /// Cascades the account's ledger and cart rows in the same transaction.
    pub async fn delete_account(&self, caller: &Account) -> ApiResult<()> {
        self.state.db.accounts().delete_cascade(&caller.id).await?;
        self.state.locks.release_account(&caller.id);

        info!(account_id = %caller.id, "Account deleted");
        Ok(())
    }

    // =========================================================================
    // Admin-gated operations
    // =========================================================================

    /// List every account with its owned-card count.
    pub async fn list_accounts(&self, caller: &Account) -> ApiResult<Vec<AccountSummary>> {
        authorize(caller, AdminAction::ListAccounts)?;

        Ok(self.state.db.accounts().list_with_owned_counts().await?)
    }

    /// Update any account's profile or password.
    ///
    /// Identical to [`Self::update_profile`] except for the capability check
    /// and the free choice of target.
    pub async fn admin_update_account(
        &self,
        caller: &Account,
        target_id: &str,
        update: &AccountUpdate,
    ) -> ApiResult<()> {
        authorize(caller, AdminAction::UpdateAccount)?;

        self.apply_update(target_id, update).await?;

        info!(admin_id = %caller.id, target_id = %target_id, "Account updated by admin");
        Ok(())
    }

    /// Delete any account.
    pub async fn admin_delete_account(&self, caller: &Account, target_id: &str) -> ApiResult<()> {
        authorize(caller, AdminAction::DeleteAccount)?;

        self.state.db.accounts().delete_cascade(target_id).await?;
        self.state.locks.release_account(target_id);

        info!(admin_id = %caller.id, target_id = %target_id, "Account deleted by admin");
        Ok(())
    }

    /// View another account's collection.
    pub async fn admin_list_owned(
        &self,
        caller: &Account,
        target_id: &str,
    ) -> ApiResult<Vec<OwnedCard>> {
        authorize(caller, AdminAction::ViewCollection)?;

        // Distinguish "account missing" from "empty collection".
        if self.state.db.accounts().get_by_id(target_id).await?.is_none() {
            return Err(CoreError::AccountNotFound(target_id.to_string()).into());
        }

        Ok(self.state.db.ownerships().list_owned(target_id).await?)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Validates and applies a partial update to an account row.
    ///
    /// Supplied fields are validated with the same rules as registration.
    /// A fully-falsy update is a no-op that still succeeds.
    async fn apply_update(&self, account_id: &str, update: &AccountUpdate) -> ApiResult<()> {
        if update.is_empty() {
            return Ok(());
        }

        if let Some(name) = update.name() {
            validate_display_name(name).map_err(CoreError::from)?;
        }
        if let Some(email) = update.email() {
            validate_email(email).map_err(CoreError::from)?;
        }
        if let Some(password) = update.password() {
            validate_password(password).map_err(CoreError::from)?;
        }

        let patch = AccountPatch {
            name: update.name().map(str::to_string),
            email: update.email().map(str::to_string),
            password_hash: match update.password() {
                Some(password) => Some(hash_password(password)?),
                None => None,
            },
        };

        self.state.db.accounts().update(account_id, &patch).await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
