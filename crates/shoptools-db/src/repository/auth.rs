//! # Credential & Session Repositories
//!
//! The identity provider's own tables.
//!
//! ```text
//! credentials    identity_id ◄── auth_sessions.identity_id
//!   email (unique, lowercase)       jti (token id)
//!   password_hash (argon2 PHC)      expires_at
//! ```
//!
//! Hashing and token signing live in the gateway; this module only stores
//! what those produce.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

// =============================================================================
// Credentials
// =============================================================================

/// A sign-in account.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CredentialRecord {
    pub identity_id: String,
    /// Stored lowercase.
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for sign-in accounts.
#[derive(Debug, Clone)]
pub struct CredentialRepository {
    pool: SqlitePool,
}

impl CredentialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CredentialRepository { pool }
    }

    /// Inserts a credential.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the email is already registered.
    pub async fn insert(&self, credential: &CredentialRecord) -> DbResult<()> {
        debug!(identity_id = %credential.identity_id, "Inserting credential");

        sqlx::query(
            r#"
            INSERT INTO credentials (identity_id, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&credential.identity_id)
        .bind(credential.email.to_lowercase())
        .bind(&credential.password_hash)
        .bind(credential.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.ends_with("email") => {
                DbError::duplicate("email", &credential.email)
            }
            other => other,
        })?;

        Ok(())
    }

    /// Looks an account up by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<CredentialRecord>> {
        let record = sqlx::query_as::<_, CredentialRecord>(
            r#"
            SELECT identity_id, email, password_hash, created_at
            FROM credentials
            WHERE email = ?1
            "#,
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Removes an account and, by cascade, its sessions.
    pub async fn delete(&self, identity_id: &str) -> DbResult<bool> {
        debug!(identity_id = %identity_id, "Deleting credential");

        let result = sqlx::query("DELETE FROM credentials WHERE identity_id = ?1")
            .bind(identity_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Auth Sessions
// =============================================================================

/// One issued session token.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AuthSessionRecord {
    /// The token's `jti` claim.
    pub jti: String,
    pub identity_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Repository for issued session tokens.
#[derive(Debug, Clone)]
pub struct AuthSessionRepository {
    pool: SqlitePool,
}

impl AuthSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AuthSessionRepository { pool }
    }

    /// Records a freshly issued token.
    pub async fn insert(&self, session: &AuthSessionRecord) -> DbResult<()> {
        debug!(identity_id = %session.identity_id, "Recording auth session");

        sqlx::query(
            r#"
            INSERT INTO auth_sessions (jti, identity_id, issued_at, expires_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&session.jti)
        .bind(&session.identity_id)
        .bind(session.issued_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns the session if it exists and has not expired at `now`.
    pub async fn find_active(
        &self,
        jti: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<AuthSessionRecord>> {
        let record = sqlx::query_as::<_, AuthSessionRecord>(
            r#"
            SELECT jti, identity_id, issued_at, expires_at
            FROM auth_sessions
            WHERE jti = ?1
            "#,
        )
        .bind(jti)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.filter(|s| s.expires_at > now))
    }

    /// Revokes a token. Returns whether it was still recorded.
    pub async fn revoke(&self, jti: &str) -> DbResult<bool> {
        debug!(jti = %jti, "Revoking auth session");

        let result = sqlx::query("DELETE FROM auth_sessions WHERE jti = ?1")
            .bind(jti)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every session that expired before `now`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= ?1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            debug!(purged, "Purged expired auth sessions");
        }
        Ok(purged)
    }
}
