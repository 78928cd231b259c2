//! Change notification between writers and mounted views.
//!
//! Two channels run side by side: typed `ChangeEvent`s that subscribers can
//! filter by kind and id, and `StorageSignal`s that carry the serialized
//! document under a key such as `page_home`. Publishing is fire-and-forget:
//! nothing is queued for subscribers that join later.

use crate::domain::{Document, DocumentKind};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use xxhash_rust::xxh3::xxh3_64;

pub const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: DocumentKind,
    pub id: String,
    pub version: u64,
    // xxh3 of the serialized document, diagnostic only
    pub content_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSignal {
    pub key: String,
    pub new_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub kind: Option<DocumentKind>,
    pub id: Option<String>,
}

impl EventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn kind(kind: DocumentKind) -> Self {
        Self {
            kind: Some(kind),
            id: None,
        }
    }

    pub fn document(kind: DocumentKind, id: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            id: Some(id.into()),
        }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        self.kind.map_or(true, |kind| kind == event.kind)
            && self.id.as_deref().map_or(true, |id| id == event.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Changed(ChangeEvent),
    // the subscriber fell behind and `n` events were dropped; re-read everything
    Lagged(u64),
}

#[derive(Clone)]
pub struct ChangeBus {
    events: broadcast::Sender<ChangeEvent>,
    signals: broadcast::Sender<StorageSignal>,
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        let (signals, _) = broadcast::channel(capacity);
        Self { events, signals }
    }

    /// Returns how many subscribers received the event.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        tracing::debug!(kind = %event.kind, id = %event.id, version = event.version, "Publishing change");
        self.events.send(event).unwrap_or(0)
    }

    pub fn signal(&self, key: impl Into<String>, new_value: impl Into<String>) -> usize {
        self.signals
            .send(StorageSignal {
                key: key.into(),
                new_value: new_value.into(),
            })
            .unwrap_or(0)
    }

    /// Publishes a change event for `doc` and the matching storage signal.
    pub fn announce<D: Document>(&self, doc: &D, version: u64) {
        let serialized = match serde_json::to_string(doc) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(kind = %D::KIND, id = doc.id(), "Failed to serialize change payload: {}", e);
                String::new()
            }
        };

        self.publish(ChangeEvent {
            kind: D::KIND,
            id: doc.id().to_string(),
            version,
            content_hash: format!("{:016x}", xxh3_64(serialized.as_bytes())),
        });
        self.signal(D::KIND.signal_key(doc.id()), serialized);
    }

    /// Publishes the removal of a document: version 0, no content hash, and
    /// a storage signal with an empty value.
    pub fn retract<D: Document>(&self, id: &str) {
        self.publish(ChangeEvent {
            kind: D::KIND,
            id: id.to_string(),
            version: 0,
            content_hash: String::new(),
        });
        self.signal(D::KIND.signal_key(id), String::new());
    }

    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        Subscription {
            receiver: self.events.subscribe(),
            filter,
        }
    }

    pub fn subscribe_signals(&self) -> broadcast::Receiver<StorageSignal> {
        self.signals.subscribe()
    }
}

pub struct Subscription {
    receiver: broadcast::Receiver<ChangeEvent>,
    filter: EventFilter,
}

impl Subscription {
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Waits for the next matching notification. `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => {
                    return Some(Notification::Changed(event));
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => return Some(Notification::Lagged(skipped)),
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
