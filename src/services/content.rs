use crate::domain::Document;
use crate::events::ChangeBus;
use crate::seed;
use crate::services::remote::{RemoteClient, UploadFile};
use crate::store::ContentStore;
use std::sync::Arc;

/// Read and write paths over the local store, the remote API and the
/// built-in content.
///
/// Reads go store → remote → static fallback. Writes go to the store first
/// and only reach the remote when the store reports failure. Every successful
/// write or delete is announced on the change bus.
pub struct ContentService {
    store: Arc<ContentStore>,
    remote: Option<RemoteClient>,
    bus: ChangeBus,
}

impl ContentService {
    pub fn new(store: Arc<ContentStore>, remote: Option<RemoteClient>, bus: ChangeBus) -> Self {
        Self { store, remote, bus }
    }

    pub fn store(&self) -> &Arc<ContentStore> {
        &self.store
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    pub async fn resolve<D: Document>(&self, id: &str) -> Option<D> {
        if let Some(doc) = self.store.get_document::<D>(id).await {
            return Some(doc);
        }

        if let Some(remote) = &self.remote {
            if let Some(doc) = remote.fetch_document::<D>(id).await {
                tracing::debug!(kind = %D::KIND, id, "Resolved from remote");
                return Some(doc);
            }
        }

        let fallback = seed::static_fallback::<D>(id);
        if fallback.is_some() {
            tracing::debug!(kind = %D::KIND, id, "Resolved from static fallback");
        }
        fallback
    }

    /// Lists a kind: the local blob when one exists, else the remote listing,
    /// else the built-in documents.
    pub async fn resolve_all<D: Document>(&self) -> Vec<D> {
        if self.store.has_blob(D::KIND).await {
            return self.store.get_all_documents::<D>().await;
        }

        if let Some(remote) = &self.remote {
            if let Some(docs) = remote.fetch_all::<D>().await {
                return docs;
            }
        }

        D::defaults()
    }

    pub async fn persist<D: Document>(&self, doc: &D) -> bool {
        match self.store.save_versioned(doc).await {
            Ok(version) => {
                self.bus.announce(doc, version);
                true
            }
            Err(e) => {
                tracing::error!(kind = %D::KIND, id = doc.id(), "Local save failed, trying remote: {:#}", e);
                self.persist_remote(doc).await
            }
        }
    }

    /// Like `persist`, but rejects the write when the stored version moved
    /// past `expected`. Never falls back to the remote.
    pub async fn persist_checked<D: Document>(
        &self,
        doc: &D,
        expected: u64,
    ) -> Result<u64, crate::store::StoreError> {
        let version = self.store.save_document_checked(doc, expected).await?;
        self.bus.announce(doc, version);
        Ok(version)
    }

    pub async fn remove<D: Document>(&self, id: &str) -> bool {
        let removed = if self.store.delete_document::<D>(id).await {
            true
        } else {
            match &self.remote {
                Some(remote) => remote.delete_document::<D>(id).await,
                None => false,
            }
        };

        if removed {
            self.bus.retract::<D>(id);
        }
        removed
    }

    pub async fn upload(&self, file: UploadFile) -> Option<String> {
        match &self.remote {
            Some(remote) => remote.upload(file).await,
            None => {
                tracing::warn!("No remote API configured for uploads");
                None
            }
        }
    }

    async fn persist_remote<D: Document>(&self, doc: &D) -> bool {
        let Some(remote) = &self.remote else {
            return false;
        };

        let saved = remote.save_document(doc).await;
        if saved {
            // remote writes carry no local version
            self.bus.announce(doc, 0);
        }
        saved
    }
}
