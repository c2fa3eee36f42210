use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

use super::kv::StorageError;

const CREATE_KV_ENTRIES: &str = r#"
    CREATE TABLE IF NOT EXISTS kv_entries (
        "key" TEXT PRIMARY KEY NOT NULL,
        "value" TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
"#;

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, StorageError> {
    tracing::info!("Connecting to database: {}", database_url);

    // Handle special SQLite URL formats
    let db = if database_url == "sqlite::memory:" {
        // Every pooled connection would get its own private in-memory database
        let mut options = ConnectOptions::new(database_url);
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        Database::connect(options).await.map_err(connection_failed)?
    } else if let Some(path_str) = database_url.strip_prefix("sqlite://") {
        let path_str = path_str.split('?').next().unwrap_or(path_str);
        let path = std::path::Path::new(path_str);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                tracing::info!("Created database directory: {}", parent.display());
            }
        }

        if !path.exists() {
            std::fs::File::create(path)?;
            tracing::info!("Created database file: {}", path.display());
        }

        let mut options = ConnectOptions::new(database_url);
        options.sqlx_logging(false);
        Database::connect(options).await.map_err(connection_failed)?
    } else {
        return Err(StorageError::InvalidUrl(database_url.to_string()));
    };

    db.execute_unprepared(CREATE_KV_ENTRIES).await?;
    tracing::debug!("kv_entries table ready");

    Ok(db)
}

fn connection_failed(e: DbErr) -> StorageError {
    StorageError::DbError(DbErr::Custom(format!("Connection failed: {}", e)))
}
