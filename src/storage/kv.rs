use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DbError(#[from] sea_orm::DbErr),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid database URL: {0}")]
    InvalidUrl(String),
}

/// String-to-string storage that survives restarts (or, for tests, doesn't).
///
/// `increment` must be atomic: concurrent callers never observe the same
/// prior value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Adds one to the integer stored under `key` and returns the new value.
    /// A missing or non-numeric value counts as 0.
    async fn increment(&self, key: &str) -> Result<u64, StorageError>;
}

/// Reads a stored counter. Anything that is not a non-negative integer is 0.
pub fn parse_counter(key: &str, raw: Option<&str>) -> u64 {
    match raw {
        None => 0,
        Some(value) => match value.trim().parse::<u64>() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!("Counter {} holds non-numeric value {:?}, treating as 0", key, value);
                0
            }
        },
    }
}
