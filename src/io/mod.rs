use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

pub mod local;

#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Persists an uploaded file and returns the public URL it is served at.
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String>;
}

/// Joins `relative` onto `root`, refusing anything that would escape it.
pub fn verify_relative_path(root: &Path, relative: &Path) -> Result<PathBuf> {
    let mut depth: usize = 0;
    for component in relative.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| anyhow!("Path {} escapes {}", relative.display(), root.display()))?;
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(anyhow!("Absolute path {} not allowed", relative.display()));
            }
        }
    }

    Ok(root.join(relative))
}

/// Lowercased extension of an uploaded file name, if it is a plain
/// alphanumeric one.
pub fn upload_extension(original_name: &str) -> Option<String> {
    let extension = Path::new(original_name).extension()?.to_str()?;
    if extension.is_empty()
        || extension.len() > 8
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}
