use anyhow::Result;
use async_trait::async_trait;

pub mod memory;
pub mod sqlite;

// a storage port can be shared between threads (referencable)
// it knows nothing about documents: keys map to opaque serialized blobs
// backend specific implementations live in "memory.rs" and "sqlite.rs"
#[async_trait]
pub trait StoragePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn keys(&self) -> Result<Vec<String>>;

    // write operations
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}
