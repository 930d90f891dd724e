//! # Identity Repository
//!
//! User profile documents. Identities are created at registration and
//! mutated by profile updates; they are never deleted.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shoptools_core::{Identity, Role};

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: String,
    name: String,
    email: String,
    role: String,
    company_id: String,
    phone: String,
    avatar: Option<String>,
    website: Option<String>,
    wechat: Option<String>,
    facebook: Option<String>,
    instagram: Option<String>,
    youtube: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = DbError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: String| DbError::corrupt("Identity", e))?;

        Ok(Identity {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            company_id: row.company_id,
            phone: row.phone,
            avatar: row.avatar,
            website: row.website,
            wechat: row.wechat,
            facebook: row.facebook,
            instagram: row.instagram,
            youtube: row.youtube,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for identity (profile) records.
#[derive(Debug, Clone)]
pub struct IdentityRepository {
    pool: SqlitePool,
}

impl IdentityRepository {
    /// Creates a new IdentityRepository.
    pub fn new(pool: SqlitePool) -> Self {
        IdentityRepository { pool }
    }

    /// Inserts a new identity. Its company must already exist.
    pub async fn insert(&self, identity: &Identity) -> DbResult<()> {
        debug!(id = %identity.id, company_id = %identity.company_id, "Inserting identity");

        sqlx::query(
            r#"
            INSERT INTO identities (
                id, name, email, role, company_id, phone,
                avatar, website, wechat, facebook, instagram, youtube,
                created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&identity.id)
        .bind(&identity.name)
        .bind(&identity.email)
        .bind(identity.role.as_str())
        .bind(&identity.company_id)
        .bind(&identity.phone)
        .bind(&identity.avatar)
        .bind(&identity.website)
        .bind(&identity.wechat)
        .bind(&identity.facebook)
        .bind(&identity.instagram)
        .bind(&identity.youtube)
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an identity by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Identity))` - Profile found
    /// * `Ok(None)` - No profile document for this ID
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                id, name, email, role, company_id, phone,
                avatar, website, wechat, facebook, instagram, youtube,
                created_at, updated_at
            FROM identities
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Identity::try_from).transpose()
    }

    /// Writes the editable profile fields back.
    ///
    /// `email`, `role` and `company_id` are never rewritten here.
    pub async fn update(&self, identity: &Identity) -> DbResult<()> {
        debug!(id = %identity.id, "Updating identity");

        let result = sqlx::query(
            r#"
            UPDATE identities SET
                name = ?2,
                phone = ?3,
                avatar = ?4,
                website = ?5,
                wechat = ?6,
                facebook = ?7,
                instagram = ?8,
                youtube = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(&identity.id)
        .bind(&identity.name)
        .bind(&identity.phone)
        .bind(&identity.avatar)
        .bind(&identity.website)
        .bind(&identity.wechat)
        .bind(&identity.facebook)
        .bind(&identity.instagram)
        .bind(&identity.youtube)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Identity", &identity.id));
        }

        Ok(())
    }
}
