use async_trait::async_trait;
use sea_orm::{
    prelude::*, sea_query::OnConflict, ConnectionTrait, DatabaseConnection, Set,
    TransactionTrait,
};
use tokio::sync::Mutex;

use super::db::init_db;
use super::entities::kv_entries;
use super::kv::{parse_counter, KeyValueStore, StorageError};

/// Durable store backed by a single SQLite table.
pub struct SqliteStore {
    db: DatabaseConnection,
    // Serializes read-modify-write sequences issued from this process
    increment_lock: Mutex<()>,
}

impl SqliteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            increment_lock: Mutex::new(()),
        }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let db = init_db(database_url).await?;
        Ok(Self::new(db))
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn upsert<C>(conn: &C, key: &str, value: &str) -> Result<(), StorageError>
    where
        C: ConnectionTrait,
    {
        let entry = kv_entries::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(chrono::Utc::now().naive_utc().to_string()),
        };

        kv_entries::Entity::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entries::Column::Key)
                    .update_columns([kv_entries::Column::Value, kv_entries::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let model = kv_entries::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(|m| m.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::upsert(&self.db, key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        kv_entries::Entity::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<u64, StorageError> {
        let _guard = self.increment_lock.lock().await;
        let txn = self.db.begin().await?;

        let current = kv_entries::Entity::find_by_id(key.to_string())
            .one(&txn)
            .await?;
        let next = parse_counter(key, current.as_ref().map(|m| m.value.as_str())) + 1;
        Self::upsert(&txn, key, &next.to_string()).await?;

        txn.commit().await?;
        tracing::debug!("Counter {} -> {}", key, next);
        Ok(next)
    }
}
