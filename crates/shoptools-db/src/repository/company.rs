//! # Company Repository
//!
//! Tenants. A company row is written once, by the registration saga, and
//! removed only as that saga's compensation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shoptools_core::Company;

#[derive(sqlx::FromRow)]
struct CompanyRow {
    id: String,
    name: String,
    master_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: row.id,
            name: row.name,
            master_id: row.master_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for company records.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CompanyRepository { pool }
    }

    /// Inserts a new company.
    pub async fn insert(&self, company: &Company) -> DbResult<()> {
        debug!(id = %company.id, name = %company.name, "Inserting company");

        sqlx::query(
            r#"
            INSERT INTO companies (id, name, master_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&company.id)
        .bind(&company.name)
        .bind(&company.master_id)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a company by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, name, master_id, created_at, updated_at
            FROM companies
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Company::from))
    }

    /// Deletes a company. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting company");

        let result = sqlx::query("DELETE FROM companies WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use chrono::Utc;
    use shoptools_core::Company;

    #[tokio::test]
    async fn test_insert_get_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.companies();
        let now = Utc::now();

        let company = Company {
            id: "company_u-1".to_string(),
            name: "Acme".to_string(),
            master_id: "u-1".to_string(),
            created_at: now,
            updated_at: now,
        };
        repo.insert(&company).await.unwrap();

        let loaded = repo.get_by_id("company_u-1").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Acme");
        assert_eq!(loaded.master_id, "u-1");

        assert!(repo.delete("company_u-1").await.unwrap());
        assert!(!repo.delete("company_u-1").await.unwrap());
        assert!(repo.get_by_id("company_u-1").await.unwrap().is_none());
    }
}
