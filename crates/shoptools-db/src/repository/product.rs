//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Company listing, newest first
//! - Listing by supplier (the supplier detail view)
//! - CRUD operations
//!
//! `supplier_id` is a plain column: products outlive a deleted supplier.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shoptools_core::Product;

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, company_id, name, description, price_cents, stock,
        supplier_id, is_winner, created_at, updated_at
    FROM products
"#;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: String,
    company_id: String,
    name: String,
    description: String,
    price_cents: i64,
    stock: i64,
    supplier_id: String,
    is_winner: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            company_id: row.company_id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            stock: row.stock,
            supplier_id: row.supplier_id,
            is_winner: row.is_winner,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let products = repo.list_by_company("company_u-1").await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists a company's products, newest first.
    pub async fn list_by_company(&self, company_id: &str) -> DbResult<Vec<Product>> {
        debug!(company_id = %company_id, "Listing products");

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_COLUMNS} WHERE company_id = ?1 ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Lists the products of one supplier within a company, newest first.
    pub async fn list_by_supplier(
        &self,
        company_id: &str,
        supplier_id: &str,
    ) -> DbResult<Vec<Product>> {
        debug!(company_id = %company_id, supplier_id = %supplier_id, "Listing products by supplier");

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_COLUMNS} WHERE company_id = ?1 AND supplier_id = ?2 \
             ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(company_id)
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Gets a product by its ID, regardless of company.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, company_id, name, description, price_cents, stock,
                supplier_id, is_winner, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.company_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.supplier_id)
        .bind(product.is_winner)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites every mutable column of an existing product.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                stock = ?5,
                supplier_id = ?6,
                is_winner = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(&product.supplier_id)
        .bind(product.is_winner)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Hard-deletes a product. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use chrono::{Duration, Utc};
    use shoptools_core::Product;

    fn product(id: &str, company_id: &str, supplier_id: &str, age_secs: i64) -> Product {
        let created = Utc::now() - Duration::seconds(age_secs);
        Product {
            id: id.to_string(),
            company_id: company_id.to_string(),
            name: format!("Product {id}"),
            description: "desc".to_string(),
            price_cents: 1999,
            stock: 5,
            supplier_id: supplier_id.to_string(),
            is_winner: false,
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_listings() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert(&product("p1", "c1", "s1", 30)).await.unwrap();
        repo.insert(&product("p2", "c1", "s2", 20)).await.unwrap();
        repo.insert(&product("p3", "c1", "s1", 10)).await.unwrap();
        repo.insert(&product("p4", "c2", "s1", 0)).await.unwrap();

        let all: Vec<String> = repo
            .list_by_company("c1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(all, vec!["p3", "p2", "p1"]);

        let by_supplier: Vec<String> = repo
            .list_by_supplier("c1", "s1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(by_supplier, vec!["p3", "p1"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut p = product("p1", "c1", "s1", 0);
        repo.insert(&p).await.unwrap();

        p.is_winner = true;
        p.stock = 0;
        repo.update(&p).await.unwrap();

        let loaded = repo.get_by_id("p1").await.unwrap().unwrap();
        assert!(loaded.is_winner);
        assert_eq!(loaded.stock, 0);

        assert!(repo.delete("p1").await.unwrap());
        assert!(repo.get_by_id("p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_by_schema() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut p = product("p1", "c1", "s1", 0);
        p.stock = -1;
        assert!(db.products().insert(&p).await.is_err());
    }
}
