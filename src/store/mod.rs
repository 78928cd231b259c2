//! The content store: typed documents kept as one JSON blob per kind.
//!
//! Every public accessor absorbs storage and serialization failures, logs
//! them, and reports them as `None`, an empty list or `false`. Callers decide
//! what to fall back to.

use crate::database::StoragePort;
use crate::domain::{
    BlobLayout, Document, DocumentKind, MediaItem, NewsItem, Page, TeamMember, Testimonial,
};
use anyhow::{Context, Result};
use derive_more::derive::Display;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const VERSIONS_SUFFIX: &str = "versions";
pub const RECENT_EDITS_SUFFIX: &str = "recent_edits";

#[derive(Debug, Display)]
pub enum StoreError {
    #[display("stale write to {kind}/{id}: expected version {expected}, current is {current}")]
    Conflict {
        kind: DocumentKind,
        id: String,
        expected: u64,
        current: u64,
    },
    #[display("storage failure: {_0}")]
    Storage(anyhow::Error),
}

impl std::error::Error for StoreError {}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        StoreError::Storage(err)
    }
}

pub struct ContentStore {
    storage: Arc<dyn StoragePort>,
    prefix: String,
    // serializes read-modify-write cycles issued through this store
    write_lock: Mutex<()>,
}

impl ContentStore {
    pub fn new(storage: Arc<dyn StoragePort>, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            prefix: prefix.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Seeds every document kind that has no blob yet.
    pub async fn init(&self) -> Result<()> {
        let mut seeded = Vec::new();
        if self.seed_defaults::<Page>().await? {
            seeded.push(DocumentKind::Pages);
        }
        if self.seed_defaults::<NewsItem>().await? {
            seeded.push(DocumentKind::News);
        }
        if self.seed_defaults::<TeamMember>().await? {
            seeded.push(DocumentKind::Team);
        }
        if self.seed_defaults::<Testimonial>().await? {
            seeded.push(DocumentKind::Testimonials);
        }
        if self.seed_defaults::<MediaItem>().await? {
            seeded.push(DocumentKind::Media);
        }

        tracing::info!(prefix = %self.prefix, ?seeded, "Content store initialized");
        Ok(())
    }

    /// Removes every key this store owns. The next `init` reseeds.
    pub async fn reset(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let owned = self.owned_keys();
        let mut removed = 0;
        for key in self.storage.keys().await? {
            if owned.contains(&key) {
                self.storage.remove(&key).await?;
                removed += 1;
            }
        }

        tracing::info!(prefix = %self.prefix, removed, "Content store reset");
        Ok(())
    }

    // every key this store may write; other prefixes sharing the storage are left alone
    fn owned_keys(&self) -> Vec<String> {
        DocumentKind::ALL
            .iter()
            .map(|kind| kind.storage_key(&self.prefix))
            .chain([self.key(VERSIONS_SUFFIX), self.key(RECENT_EDITS_SUFFIX)])
            .collect()
    }

    pub async fn has_blob(&self, kind: DocumentKind) -> bool {
        match self.storage.get(&kind.storage_key(&self.prefix)).await {
            Ok(blob) => blob.is_some(),
            Err(e) => {
                tracing::error!(%kind, "Failed to check blob presence: {:#}", e);
                false
            }
        }
    }

    /// Writes the built-in documents for `D` unless a blob already exists.
    /// Returns whether anything was written.
    pub async fn seed_defaults<D: Document>(&self) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let key = D::KIND.storage_key(&self.prefix);
        if self.storage.get(&key).await?.is_some() {
            return Ok(false);
        }

        self.write_blob::<D>(&D::defaults()).await?;
        tracing::debug!(kind = %D::KIND, "Seeded default documents");
        Ok(true)
    }

    pub async fn get_document<D: Document>(&self, id: &str) -> Option<D> {
        match self.read_blob::<D>().await {
            Ok(Some(docs)) => docs.into_iter().find(|doc| doc.id() == id),
            Ok(None) => None,
            Err(e) => {
                tracing::error!(kind = %D::KIND, id, "Error loading document: {:#}", e);
                None
            }
        }
    }

    /// All documents of a kind in insertion order; empty when the kind was
    /// never written.
    pub async fn get_all_documents<D: Document>(&self) -> Vec<D> {
        match self.read_blob::<D>().await {
            Ok(docs) => docs.unwrap_or_default(),
            Err(e) => {
                tracing::error!(kind = %D::KIND, "Error loading documents: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Upserts by id with last-write-wins semantics. Reports false only when
    /// the document could not be serialized or written.
    pub async fn save_document<D: Document>(&self, doc: &D) -> bool {
        match self.save_versioned(doc).await {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(kind = %D::KIND, id = doc.id(), "Error saving document: {:#}", e);
                false
            }
        }
    }

    /// Upserts and returns the document's new version.
    pub async fn save_versioned<D: Document>(&self, doc: &D) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        self.upsert_locked(doc).await
    }

    /// Upserts only if the stored version still equals `expected` (0 for a
    /// document that was never saved).
    pub async fn save_document_checked<D: Document>(
        &self,
        doc: &D,
        expected: u64,
    ) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;

        let current = self
            .read_versions()
            .await?
            .get(&version_key(D::KIND, doc.id()))
            .copied()
            .unwrap_or(0);
        if current != expected {
            tracing::warn!(kind = %D::KIND, id = doc.id(), expected, current, "Rejected stale write");
            return Err(StoreError::Conflict {
                kind: D::KIND,
                id: doc.id().to_string(),
                expected,
                current,
            });
        }

        Ok(self.upsert_locked(doc).await?)
    }

    /// Removes a document by id. Deleting an absent id succeeds and leaves
    /// the blob untouched.
    pub async fn delete_document<D: Document>(&self, id: &str) -> bool {
        let _guard = self.write_lock.lock().await;

        match self.delete_locked::<D>(id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(kind = %D::KIND, id, "Error deleting document: {:#}", e);
                false
            }
        }
    }

    pub async fn version_of(&self, kind: DocumentKind, id: &str) -> u64 {
        match self.read_versions().await {
            Ok(versions) => versions.get(&version_key(kind, id)).copied().unwrap_or(0),
            Err(e) => {
                tracing::error!(%kind, id, "Error loading versions: {:#}", e);
                0
            }
        }
    }

    async fn upsert_locked<D: Document>(&self, doc: &D) -> Result<u64> {
        let mut docs = self.read_blob::<D>().await?.unwrap_or_default();

        match docs.iter().position(|existing| existing.id() == doc.id()) {
            Some(index) => docs[index] = doc.clone(),
            None => docs.push(doc.clone()),
        }

        self.write_blob(&docs).await?;

        // the document is saved from here on; a failed bump only loses the counter
        let version = match self.bump_version(D::KIND, doc.id()).await {
            Ok(version) => version,
            Err(e) => {
                tracing::warn!(kind = %D::KIND, id = doc.id(), "Saved document but failed to bump its version: {:#}", e);
                self.version_of(D::KIND, doc.id()).await
            }
        };

        tracing::debug!(kind = %D::KIND, id = doc.id(), version, "Saved document");
        Ok(version)
    }

    async fn bump_version(&self, kind: DocumentKind, id: &str) -> Result<u64> {
        let mut versions = self.read_versions().await?;
        let version = versions.entry(version_key(kind, id)).or_insert(0);
        *version += 1;
        let version = *version;
        self.write_value(VERSIONS_SUFFIX, &versions).await?;
        Ok(version)
    }

    async fn delete_locked<D: Document>(&self, id: &str) -> Result<()> {
        let Some(mut docs) = self.read_blob::<D>().await? else {
            return Ok(());
        };

        let before = docs.len();
        docs.retain(|doc| doc.id() != id);
        if docs.len() == before {
            tracing::debug!(kind = %D::KIND, id, "Delete of absent document ignored");
            return Ok(());
        }

        self.write_blob(&docs).await?;

        if let Err(e) = self.drop_version(D::KIND, id).await {
            tracing::warn!(kind = %D::KIND, id, "Deleted document but failed to drop its version: {:#}", e);
        }

        tracing::debug!(kind = %D::KIND, id, "Deleted document");
        Ok(())
    }

    async fn drop_version(&self, kind: DocumentKind, id: &str) -> Result<()> {
        let mut versions = self.read_versions().await?;
        if versions.remove(&version_key(kind, id)).is_some() {
            self.write_value(VERSIONS_SUFFIX, &versions).await?;
        }
        Ok(())
    }

    async fn read_blob<D: Document>(&self) -> Result<Option<Vec<D>>> {
        let key = D::KIND.storage_key(&self.prefix);
        let Some(raw) = self.storage.get(&key).await? else {
            return Ok(None);
        };

        let docs = match D::KIND.layout() {
            BlobLayout::List => {
                serde_json::from_str::<Vec<D>>(&raw).context(format!("Malformed blob {}", key))?
            }
            BlobLayout::Map => {
                let map: Map<String, Value> =
                    serde_json::from_str(&raw).context(format!("Malformed blob {}", key))?;
                map.into_iter()
                    .map(|(id, value)| {
                        serde_json::from_value::<D>(value)
                            .context(format!("Malformed document {} in {}", id, key))
                    })
                    .collect::<Result<Vec<D>>>()?
            }
        };

        Ok(Some(docs))
    }

    async fn write_blob<D: Document>(&self, docs: &[D]) -> Result<()> {
        let key = D::KIND.storage_key(&self.prefix);

        let raw = match D::KIND.layout() {
            BlobLayout::List => serde_json::to_string(docs),
            BlobLayout::Map => {
                let mut map = Map::new();
                for doc in docs {
                    map.insert(doc.id().to_string(), serde_json::to_value(doc)?);
                }
                serde_json::to_string(&map)
            }
        }
        .context(format!("Failed to serialize {}", key))?;

        self.storage.set(&key, &raw).await
    }

    async fn read_versions(&self) -> Result<HashMap<String, u64>> {
        Ok(self.read_value(VERSIONS_SUFFIX).await?.unwrap_or_default())
    }

    pub(crate) async fn read_value<T: DeserializeOwned>(&self, suffix: &str) -> Result<Option<T>> {
        let key = self.key(suffix);
        match self.storage.get(&key).await? {
            Some(raw) => Ok(Some(
                serde_json::from_str(&raw).context(format!("Malformed blob {}", key))?,
            )),
            None => Ok(None),
        }
    }

    pub(crate) async fn write_value<T: Serialize>(&self, suffix: &str, value: &T) -> Result<()> {
        let key = self.key(suffix);
        let raw = serde_json::to_string(value).context(format!("Failed to serialize {}", key))?;
        self.storage.set(&key, &raw).await
    }
}

fn version_key(kind: DocumentKind, id: &str) -> String {
    format!("{}/{}", kind, id)
}
