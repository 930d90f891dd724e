//! # Supplier Repository
//!
//! Database operations for suppliers.
//!
//! ## Storage Layout
//! The required core maps to plain columns; the optional extras map to
//! nullable columns plus `catalogs_json`, a JSON array of `{name, url}`.
//!
//! ## Ordering
//! Listings are newest first: `created_at DESC`, with `rowid DESC` as the
//! tie-breaker for records created within the same instant.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shoptools_core::{Attachment, Supplier, SupplierExtras};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, company_id, company_name, contact_name, email, phone, country,
        website, wechat, notes, logo, catalogs_json,
        created_at, updated_at
    FROM suppliers
"#;

#[derive(sqlx::FromRow)]
struct SupplierRow {
    id: String,
    company_id: String,
    company_name: String,
    contact_name: String,
    email: String,
    phone: String,
    country: String,
    website: Option<String>,
    wechat: Option<String>,
    notes: Option<String>,
    logo: Option<String>,
    catalogs_json: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SupplierRow> for Supplier {
    type Error = DbError;

    fn try_from(row: SupplierRow) -> Result<Self, Self::Error> {
        let catalogs: Vec<Attachment> = serde_json::from_str(&row.catalogs_json)
            .map_err(|e| DbError::corrupt("Supplier", format!("{}: {e}", row.id)))?;

        Ok(Supplier {
            id: row.id,
            company_id: row.company_id,
            company_name: row.company_name,
            contact_name: row.contact_name,
            email: row.email,
            phone: row.phone,
            country: row.country,
            extras: SupplierExtras {
                website: row.website,
                wechat: row.wechat,
                notes: row.notes,
                logo: row.logo,
                catalogs,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn catalogs_json(supplier: &Supplier) -> DbResult<String> {
    serde_json::to_string(&supplier.extras.catalogs)
        .map_err(|e| DbError::Internal(format!("catalogs serialization: {e}")))
}

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists a company's suppliers, newest first.
    pub async fn list_by_company(&self, company_id: &str) -> DbResult<Vec<Supplier>> {
        debug!(company_id = %company_id, "Listing suppliers");

        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "{SELECT_COLUMNS} WHERE company_id = ?1 ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Supplier::try_from).collect()
    }

    /// Lists a company's suppliers located in `country`, newest first.
    pub async fn list_by_country(&self, company_id: &str, country: &str) -> DbResult<Vec<Supplier>> {
        debug!(company_id = %company_id, country = %country, "Listing suppliers by country");

        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "{SELECT_COLUMNS} WHERE company_id = ?1 AND country = ?2 \
             ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(company_id)
        .bind(country)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Supplier::try_from).collect()
    }

    /// Gets a supplier by its ID, regardless of company.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Supplier::try_from).transpose()
    }

    /// Inserts a new supplier.
    pub async fn insert(&self, supplier: &Supplier) -> DbResult<()> {
        debug!(id = %supplier.id, company_id = %supplier.company_id, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, company_id, company_name, contact_name, email, phone, country,
                website, wechat, notes, logo, catalogs_json,
                created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.company_id)
        .bind(&supplier.company_name)
        .bind(&supplier.contact_name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.country)
        .bind(&supplier.extras.website)
        .bind(&supplier.extras.wechat)
        .bind(&supplier.extras.notes)
        .bind(&supplier.extras.logo)
        .bind(catalogs_json(supplier)?)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites every mutable column of an existing supplier.
    pub async fn update(&self, supplier: &Supplier) -> DbResult<()> {
        debug!(id = %supplier.id, "Updating supplier");

        let result = sqlx::query(
            r#"
            UPDATE suppliers SET
                company_name = ?2,
                contact_name = ?3,
                email = ?4,
                phone = ?5,
                country = ?6,
                website = ?7,
                wechat = ?8,
                notes = ?9,
                logo = ?10,
                catalogs_json = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.company_name)
        .bind(&supplier.contact_name)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.country)
        .bind(&supplier.extras.website)
        .bind(&supplier.extras.wechat)
        .bind(&supplier.extras.notes)
        .bind(&supplier.extras.logo)
        .bind(catalogs_json(supplier)?)
        .bind(supplier.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", &supplier.id));
        }

        Ok(())
    }

    /// Hard-deletes a supplier. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting supplier");

        let result = sqlx::query("DELETE FROM suppliers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use chrono::{Duration, Utc};
    use shoptools_core::{Attachment, Supplier, SupplierExtras};

    fn supplier(id: &str, company_id: &str, country: &str, age_secs: i64) -> Supplier {
        let created = Utc::now() - Duration::seconds(age_secs);
        Supplier {
            id: id.to_string(),
            company_id: company_id.to_string(),
            company_name: format!("{id} Ltd"),
            contact_name: "Li".to_string(),
            email: "li@x.test".to_string(),
            phone: "1".to_string(),
            country: country.to_string(),
            extras: SupplierExtras::default(),
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_list_is_company_scoped_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        repo.insert(&supplier("old", "c1", "China", 60)).await.unwrap();
        repo.insert(&supplier("other", "c2", "China", 30)).await.unwrap();
        repo.insert(&supplier("new", "c1", "Spain", 0)).await.unwrap();

        let ids: Vec<String> = repo
            .list_by_company("c1")
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["new", "old"]);

        let chinese = repo.list_by_country("c1", "China").await.unwrap();
        assert_eq!(chinese.len(), 1);
        assert_eq!(chinese[0].id, "old");
    }

    #[tokio::test]
    async fn test_same_instant_falls_back_to_insert_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        let first = supplier("first", "c1", "China", 0);
        let mut second = supplier("second", "c1", "China", 0);
        second.created_at = first.created_at;
        repo.insert(&first).await.unwrap();
        repo.insert(&second).await.unwrap();

        let list = repo.list_by_company("c1").await.unwrap();
        assert_eq!(list[0].id, "second");
    }

    #[tokio::test]
    async fn test_extras_round_trip_and_update() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        let mut s = supplier("s1", "c1", "China", 0);
        s.extras.catalogs.push(Attachment {
            name: "2024.pdf".to_string(),
            url: "/files/supplier-catalogs/1-2024.pdf".to_string(),
        });
        s.extras.logo = Some("/files/supplier-logos/1-logo.png".to_string());
        repo.insert(&s).await.unwrap();

        let loaded = repo.get_by_id("s1").await.unwrap().unwrap();
        assert_eq!(loaded.extras, s.extras);

        s.country = "Vietnam".to_string();
        s.extras.logo = None;
        repo.update(&s).await.unwrap();
        let loaded = repo.get_by_id("s1").await.unwrap().unwrap();
        assert_eq!(loaded.country, "Vietnam");
        assert_eq!(loaded.extras.logo, None);

        assert!(repo.delete("s1").await.unwrap());
        let err = repo.update(&s).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
