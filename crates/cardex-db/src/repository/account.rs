//! # Account Repository
//!
//! Database operations for accounts.
//!
//! ## Key Operations
//! - Lookup by id and by email (login path)
//! - Partial updates (only resolved columns change)
//! - Cascade delete: the account's cart and ledger rows go in the same
//!   transaction as the account row

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use cardex_core::{Account, AccountPatch, AccountSummary};

/// Repository for account database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = AccountRepository::new(pool);
///
/// let account = repo.get_by_email("avery@example.com").await?;
/// repo.delete_cascade(&account_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Gets an account by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - Account not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT
                id, name, email, password_hash, is_admin,
                created_at, updated_at
            FROM accounts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Gets an account by its email.
    ///
    /// The email is matched exactly as stored - case-sensitive, no
    /// normalization.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT
                id, name, email, password_hash, is_admin,
                created_at, updated_at
            FROM accounts
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Inserts a new account.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Email already exists
    pub async fn insert(&self, account: &Account) -> DbResult<()> {
        debug!(id = %account.id, "Inserting account");

        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, name, email, password_hash, is_admin,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&account.id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.is_admin)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies a resolved partial update to an account row.
    ///
    /// Columns with `None` in the patch keep their stored value. The
    /// falsy-skip filter (empty string = not supplied) has already been
    /// applied by the time an [`AccountPatch`] reaches this method.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Account doesn't exist
    pub async fn update(&self, id: &str, patch: &AccountPatch) -> DbResult<()> {
        debug!(id = %id, "Updating account");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE accounts SET
                name = COALESCE(?2, name),
                email = COALESCE(?3, email),
                password_hash = COALESCE(?4, password_hash),
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(&patch.password_hash)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Account", id));
        }

        Ok(())
    }

    /// Deletes an account together with its cart and ledger rows.
    ///
    /// ## Cascade Semantics
    /// The owning relationship (account owns its cart and ownership rows)
    /// is implemented as an explicit multi-delete inside one transaction,
    /// not as a schema-level cascade. Either all four deletes commit or
    /// none do.
    ///
    /// ## Returns
    /// * `Ok(())` - Account and its rows deleted
    /// * `Err(DbError::NotFound)` - Account doesn't exist (nothing deleted)
    pub async fn delete_cascade(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting account with cascade");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_entries WHERE account_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM ownerships WHERE account_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM accounts WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls the child deletes back.
            return Err(DbError::not_found("Account", id));
        }

        tx.commit().await?;

        Ok(())
    }

    /// Lists all accounts with their owned-card counts.
    ///
    /// Used by the admin accounts overview.
    pub async fn list_with_owned_counts(&self) -> DbResult<Vec<AccountSummary>> {
        let summaries = sqlx::query_as::<_, AccountSummary>(
            r#"
            SELECT
                a.id,
                a.name,
                a.email,
                (
                    SELECT COUNT(*)
                    FROM ownerships o
                    WHERE o.account_id = a.id
                ) AS cards_owned
            FROM accounts a
            ORDER BY a.created_at, a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Counts total accounts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new account ID.
pub fn generate_account_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn test_account(email: &str) -> Account {
        let now = Utc::now();
        Account {
            id: generate_account_id(),
            name: "Avery Quinn".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub-hash".to_string(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = test_db().await;
        let account = test_account("avery@example.com");

        db.accounts().insert(&account).await.unwrap();

        let by_id = db.accounts().get_by_id(&account.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "avery@example.com");
        assert!(!by_id.is_admin);

        let by_email = db
            .accounts()
            .get_by_email("avery@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, account.id);

        // Stored case-sensitively: a different casing is a different email.
        assert!(db
            .accounts()
            .get_by_email("AVERY@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;

        db.accounts()
            .insert(&test_account("taken@example.com"))
            .await
            .unwrap();

        let err = db
            .accounts()
            .insert(&test_account("taken@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // No second row was created.
        assert_eq!(db.accounts().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_partial_update_leaves_omitted_columns() {
        let db = test_db().await;
        let account = test_account("avery@example.com");
        db.accounts().insert(&account).await.unwrap();

        let patch = AccountPatch {
            name: Some("Avery Q.".to_string()),
            email: None,
            password_hash: None,
        };
        db.accounts().update(&account.id, &patch).await.unwrap();

        let updated = db.accounts().get_by_id(&account.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Avery Q.");
        assert_eq!(updated.email, "avery@example.com");
        assert_eq!(updated.password_hash, account.password_hash);
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let db = test_db().await;

        let err = db
            .accounts()
            .update("missing-id", &AccountPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_cascade_removes_child_rows() {
        let db = test_db().await;
        let account = test_account("avery@example.com");
        db.accounts().insert(&account).await.unwrap();

        // Stage a cart row and a ledger row directly.
        sqlx::query(
            "INSERT INTO cart_entries (id, account_id, card_id, added_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind("entry-1")
        .bind(&account.id)
        .bind("card-1")
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO ownerships (id, account_id, card_id, acquired_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind("own-1")
        .bind(&account.id)
        .bind("card-2")
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();

        db.accounts().delete_cascade(&account.id).await.unwrap();

        assert!(db
            .accounts()
            .get_by_id(&account.id)
            .await
            .unwrap()
            .is_none());

        let cart_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_entries")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let owned_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ownerships")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(cart_rows, 0);
        assert_eq!(owned_rows, 0);
    }

    #[tokio::test]
    async fn test_list_with_owned_counts() {
        let db = test_db().await;
        let account = test_account("avery@example.com");
        db.accounts().insert(&account).await.unwrap();

        sqlx::query(
            "INSERT INTO ownerships (id, account_id, card_id, acquired_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind("own-1")
        .bind(&account.id)
        .bind("card-1")
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .unwrap();

        let summaries = db.accounts().list_with_owned_counts().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].cards_owned, 1);
        assert_eq!(summaries[0].email, "avery@example.com");
    }
}
