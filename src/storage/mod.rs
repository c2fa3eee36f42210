pub mod db;
pub mod entities;
pub mod kv;
pub mod memory;
pub mod sqlite_store;

pub use db::init_db;
pub use entities::kv_entries;
pub use kv::{parse_counter, KeyValueStore, StorageError};
pub use memory::MemoryStore;
pub use sqlite_store::SqliteStore;
