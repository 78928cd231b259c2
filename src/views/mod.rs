//! Read-only consumers of the content layer.

use crate::domain::{BilingualText, Document, Locale};
use crate::events::{EventFilter, Notification};
use crate::seed;
use crate::services::ContentService;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The current state of one document as a mounted view sees it.
pub struct PageView<D: Document> {
    service: Arc<ContentService>,
    id: String,
    current: Option<D>,
}

impl<D: Document> PageView<D> {
    pub async fn load(service: Arc<ContentService>, id: impl Into<String>) -> Self {
        let id = id.into();
        let current = service.resolve::<D>(&id).await;
        Self {
            service,
            id,
            current,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current(&self) -> Option<&D> {
        self.current.as_ref()
    }

    /// Re-runs the full read path.
    pub async fn refresh(&mut self) {
        self.current = self.service.resolve::<D>(&self.id).await;
    }

    /// Picks a text field from the current document and localizes it. Blank
    /// or missing text falls back to the built-in document with the same id.
    pub fn text<F>(&self, locale: Locale, pick: F) -> String
    where
        F: Fn(&D) -> Option<&BilingualText>,
    {
        let fallback_doc = seed::static_fallback::<D>(&self.id);
        let fallback = fallback_doc
            .as_ref()
            .and_then(|doc| pick(doc))
            .map(|text| text.get(locale))
            .unwrap_or_default();

        match self.current.as_ref().and_then(|doc| pick(doc)) {
            Some(text) => text.get_or(locale, fallback).to_string(),
            None => fallback.to_string(),
        }
    }

    /// Moves the view into a background task that re-reads whenever this
    /// document changes (or notifications were missed) and publishes the
    /// result. The task ends as soon as every receiver is dropped.
    pub fn watch(self) -> (watch::Receiver<Option<D>>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(self.current.clone());
        let mut subscription = self
            .service
            .bus()
            .subscribe(EventFilter::document(D::KIND, self.id.clone()));

        let mut view = self;
        let handle = tokio::spawn(async move {
            loop {
                // the view holds the service, and with it the bus; a dropped receiver ends the task regardless
                let notification = tokio::select! {
                    notification = subscription.next() => notification,
                    _ = tx.closed() => break,
                };
                let Some(notification) = notification else {
                    break;
                };

                if let Notification::Lagged(skipped) = notification {
                    tracing::warn!(kind = %D::KIND, id = %view.id, skipped, "View missed notifications, re-reading");
                }

                view.refresh().await;
                if tx.send(view.current.clone()).is_err() {
                    break;
                }
            }
            tracing::debug!(kind = %D::KIND, id = %view.id, "View watch ended");
        });

        (rx, handle)
    }
}
