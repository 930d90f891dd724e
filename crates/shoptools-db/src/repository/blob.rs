//! # Blob Repository
//!
//! File storage for uploads (avatars, supplier logos and catalogs, product
//! images). Keys are slash-separated paths such as
//! `supplier-logos/1700000000000-acme.png`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// A stored file.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredBlob {
    pub path: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BlobRepository {
    pool: SqlitePool,
}

impl BlobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BlobRepository { pool }
    }

    /// Stores a file, replacing whatever was stored at the same path.
    ///
    /// Avatars reuse `avatars/<identity id>`, so replacement is the normal case.
    pub async fn put(&self, path: &str, content_type: &str, bytes: &[u8]) -> DbResult<()> {
        debug!(path = %path, size = bytes.len(), "Storing blob");

        sqlx::query(
            r#"
            INSERT INTO blobs (path, content_type, bytes, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(path) DO UPDATE SET
                content_type = excluded.content_type,
                bytes = excluded.bytes,
                created_at = excluded.created_at
            "#,
        )
        .bind(path)
        .bind(content_type)
        .bind(bytes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Loads a file.
    pub async fn get(&self, path: &str) -> DbResult<Option<StoredBlob>> {
        let blob = sqlx::query_as::<_, StoredBlob>(
            r#"
            SELECT path, content_type, bytes, created_at
            FROM blobs
            WHERE path = ?1
            "#,
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blob)
    }

    pub async fn delete(&self, path: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM blobs WHERE path = ?1")
            .bind(path)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_put_replaces() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let blobs = db.blobs();

        blobs.put("avatars/u-1", "image/png", &[1, 2, 3]).await.unwrap();
        blobs.put("avatars/u-1", "image/jpeg", &[9]).await.unwrap();

        let stored = blobs.get("avatars/u-1").await.unwrap().unwrap();
        assert_eq!(stored.content_type, "image/jpeg");
        assert_eq!(stored.bytes, vec![9]);

        assert!(blobs.delete("avatars/u-1").await.unwrap());
        assert!(blobs.get("avatars/u-1").await.unwrap().is_none());
    }
}
