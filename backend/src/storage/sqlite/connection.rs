use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Row, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

/// Default database URL when none is configured
pub const DEFAULT_DATABASE_URL: &str = "sqlite:veggie_box.db";

/// DbConnection manages a key-value table of JSON documents
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database at {}", url);
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a private in-memory database for a test
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
        Self::new(&db_url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS key_values (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Store a value, overwriting any existing value for the same key
    pub async fn put_value(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO key_values (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM key_values WHERE key = ?")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Returns true if the key existed
    pub async fn delete_value(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM key_values WHERE key = ?")
            .bind(key)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All keys, in key order
    #[cfg(test)]
    pub async fn list_keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT key FROM key_values ORDER BY key")
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get("key")).collect())
    }

    /// Values whose key starts with `prefix`, in key order
    pub async fn list_values_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let rows = sqlx::query("SELECT key, value FROM key_values WHERE instr(key, ?) = 1 ORDER BY key")
            .bind(prefix)
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| (row.get("key"), row.get("value")))
            .collect())
    }

    /// Atomically drop every key under `prefix` and insert `entries`
    pub async fn replace_prefix(&self, prefix: &str, entries: &[(String, String)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM key_values WHERE instr(key, ?) = 1")
            .bind(prefix)
            .execute(&mut *tx)
            .await?;

        for (key, value) in entries {
            sqlx::query("INSERT OR REPLACE INTO key_values (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    #[tokio::test]
    async fn test_put_replace_and_get_value() {
        let db = setup_test().await;

        db.put_value("same_key", "initial").await.expect("Failed to put value");
        db.put_value("same_key", "updated").await.expect("Failed to update value");

        let result = db.get_value("same_key").await.expect("Failed to get value");
        assert_eq!(result.as_deref(), Some("updated"));
        assert!(db.get_value("missing").await.expect("Query failed").is_none());
    }

    #[tokio::test]
    async fn test_test_databases_are_isolated() {
        let first = setup_test().await;
        let second = setup_test().await;

        first.put_value("shared_key", "first").await.expect("Failed to put value");
        assert!(second.get_value("shared_key").await.expect("Query failed").is_none());
    }

    #[tokio::test]
    async fn test_delete_value() {
        let db = setup_test().await;
        db.put_value("doomed", "v").await.expect("Failed to put value");

        assert!(db.delete_value("doomed").await.expect("Failed to delete"));
        assert!(!db.delete_value("doomed").await.expect("Failed to re-delete"));
        assert!(db.get_value("doomed").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prefix_listing_treats_underscore_literally() {
        let db = setup_test().await;
        db.put_value("vegetable::b", "2").await.unwrap();
        db.put_value("vegetable::a", "1").await.unwrap();
        db.put_value("vegetableXXb", "x").await.unwrap();
        db.put_value("weekly_history::2024-01", "[]").await.unwrap();
        db.put_value("weeklyXhistory::2024-02", "[]").await.unwrap();

        let values = db.list_values_with_prefix("vegetable::").await.unwrap();
        assert_eq!(
            values,
            vec![
                ("vegetable::a".to_string(), "1".to_string()),
                ("vegetable::b".to_string(), "2".to_string()),
            ]
        );

        let history = db.list_values_with_prefix("weekly_history::").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(db.list_keys().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_replace_prefix_leaves_other_keys() {
        let db = setup_test().await;
        db.put_value("vegetable::old", "1").await.unwrap();
        db.put_value("other::keep", "1").await.unwrap();

        db.replace_prefix("vegetable::", &[("vegetable::new".to_string(), "2".to_string())])
            .await
            .expect("Failed to replace prefix");

        let keys = db.list_keys().await.unwrap();
        assert_eq!(keys, vec!["other::keep", "vegetable::new"]);
    }
}
