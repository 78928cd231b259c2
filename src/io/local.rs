use crate::io::{UploadStore, upload_extension, verify_relative_path};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// Writes uploads to a directory on disk. Files are named after the xxh3 hash
/// of their content, so uploading the same bytes twice yields the same URL.
pub struct LocalUploadStore {
    pub root_path: PathBuf,
    pub public_prefix: String,
}

impl LocalUploadStore {
    pub fn new(root_path: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root_path: root_path.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let stored_name = match upload_extension(original_name) {
            Some(extension) => format!("{:016x}.{}", xxh3_64(bytes), extension),
            None => format!("{:016x}", xxh3_64(bytes)),
        };

        let destination = verify_relative_path(&self.root_path, Path::new(&stored_name))?;

        tokio::fs::create_dir_all(&self.root_path)
            .await
            .with_context(|| format!("Failed to create upload dir {}", self.root_path.display()))?;
        tokio::fs::write(&destination, bytes)
            .await
            .with_context(|| format!("Failed to write upload {}", destination.display()))?;

        tracing::info!(original_name, stored_name = %stored_name, size = bytes.len(), "Stored upload");
        Ok(format!("{}/{}", self.public_prefix, stored_name))
    }
}
