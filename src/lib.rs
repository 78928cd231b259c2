//! Bilingual (French/Arabic) content persistence for the association's
//! website: a typed document store over a pluggable storage port, a
//! best-effort remote fallback, change notification, and the HTTP content
//! API that serves it all.

use std::sync::Arc;

pub mod config;
pub mod database;
pub mod domain;
pub mod editor;
pub mod events;
pub mod features;
pub mod io;
pub mod seed;
pub mod services;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

use io::UploadStore;
use services::ContentService;

#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService>,
    pub uploads: Arc<dyn UploadStore>,
}
