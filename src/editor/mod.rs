//! Admin-side editing: validation, section manipulation and saving.

use crate::domain::{
    BilingualText, Direction, Document, DocumentKind, FieldError, Locale, Page,
};
use crate::services::ContentService;
use crate::store::{RECENT_EDITS_SUFFIX, StoreError};
use chrono::{DateTime, Utc};
use derive_more::derive::Display;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

pub const RECENT_EDITS_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Saved,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEdit {
    pub kind: DocumentKind,
    pub id: String,
    pub action: EditAction,
    pub edited_at: DateTime<Utc>,
}

#[derive(Debug, Display)]
pub enum EditorError {
    #[display("validation failed: {}", join_field_errors(_0))]
    Validation(Vec<FieldError>),
    #[display("error loading {kind}/{id}")]
    Loading { kind: DocumentKind, id: String },
    #[display("error saving {kind}/{id}")]
    Saving { kind: DocumentKind, id: String },
    #[display("error deleting {kind}/{id}")]
    Deleting { kind: DocumentKind, id: String },
    #[display("content changed since it was loaded (version {expected} is now {current})")]
    Conflict { expected: u64, current: u64 },
}

impl EditorError {
    /// The inline message shown next to the form.
    pub fn user_message(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (EditorError::Validation(_), Locale::Fr) => {
                "Veuillez remplir les champs en français et en arabe"
            }
            (EditorError::Validation(_), Locale::Ar) => "يرجى ملء الحقول بالفرنسية والعربية",
            (EditorError::Loading { .. }, Locale::Fr) => "Erreur lors du chargement",
            (EditorError::Loading { .. }, Locale::Ar) => "خطأ أثناء التحميل",
            (EditorError::Saving { .. }, Locale::Fr) => "Erreur lors de l'enregistrement",
            (EditorError::Saving { .. }, Locale::Ar) => "خطأ أثناء الحفظ",
            (EditorError::Deleting { .. }, Locale::Fr) => "Erreur lors de la suppression",
            (EditorError::Deleting { .. }, Locale::Ar) => "خطأ أثناء الحذف",
            (EditorError::Conflict { .. }, Locale::Fr) => {
                "Ce contenu a été modifié ailleurs, rechargez la page"
            }
            (EditorError::Conflict { .. }, Locale::Ar) => "تم تعديل هذا المحتوى في مكان آخر، أعد تحميل الصفحة",
        }
    }
}

impl std::error::Error for EditorError {}

/// Partial update for a section; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct SectionPatch {
    pub title: Option<BilingualText>,
    pub body: Option<BilingualText>,
    pub image: Option<Option<String>>,
    pub metadata: Option<Option<Map<String, Value>>>,
}

/// A page loaded for editing, with the version it was read at.
#[derive(Debug, Clone)]
pub struct PageSession {
    page: Page,
    loaded_version: u64,
}

impl PageSession {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn loaded_version(&self) -> u64 {
        self.loaded_version
    }

    pub fn set_title(&mut self, locale: Locale, value: impl Into<String>) {
        self.page.title.set(locale, value);
    }

    pub fn add_section(&mut self, title: BilingualText, body: BilingualText) -> String {
        self.page.add_section(title, body)
    }

    pub fn update_section(&mut self, id: &str, patch: SectionPatch) -> bool {
        let Some(section) = self.page.section_mut(id) else {
            return false;
        };

        if let Some(title) = patch.title {
            section.title = title;
        }
        if let Some(body) = patch.body {
            section.body = body;
        }
        if let Some(image) = patch.image {
            section.image = image;
        }
        if let Some(metadata) = patch.metadata {
            section.metadata = metadata;
        }
        true
    }

    pub fn move_section(&mut self, id: &str, direction: Direction) -> bool {
        self.page.move_section(id, direction)
    }

    pub fn remove_section(&mut self, id: &str) -> bool {
        self.page.remove_section(id).is_some()
    }
}

pub struct ContentEditor {
    service: Arc<ContentService>,
}

impl ContentEditor {
    pub fn new(service: Arc<ContentService>) -> Self {
        Self { service }
    }

    pub async fn open_page(&self, id: &str) -> Result<PageSession, EditorError> {
        let page = self
            .service
            .resolve::<Page>(id)
            .await
            .ok_or_else(|| EditorError::Loading {
                kind: DocumentKind::Pages,
                id: id.to_string(),
            })?;

        let loaded_version = self
            .service
            .store()
            .version_of(DocumentKind::Pages, id)
            .await;

        Ok(PageSession {
            page,
            loaded_version,
        })
    }

    pub fn new_page(&self, id: impl Into<String>, title: BilingualText) -> PageSession {
        PageSession {
            page: Page::new(id, title),
            loaded_version: 0,
        }
    }

    /// Validates and saves the whole page, last write wins.
    pub async fn save_page(&self, session: &mut PageSession) -> Result<u64, EditorError> {
        ensure_valid(&session.page)?;
        session.page.last_modified = Some(Utc::now());

        if !self.service.persist(&session.page).await {
            return Err(EditorError::Saving {
                kind: DocumentKind::Pages,
                id: session.page.id.clone(),
            });
        }

        let version = self
            .service
            .store()
            .version_of(DocumentKind::Pages, &session.page.id)
            .await;
        self.after_page_saved(session, version).await;
        Ok(version)
    }

    /// Saves only if nobody else saved the page since it was opened.
    pub async fn save_page_checked(&self, session: &mut PageSession) -> Result<u64, EditorError> {
        ensure_valid(&session.page)?;
        session.page.last_modified = Some(Utc::now());

        let version = self
            .service
            .persist_checked(&session.page, session.loaded_version)
            .await
            .map_err(|e| match e {
                StoreError::Conflict {
                    expected, current, ..
                } => EditorError::Conflict { expected, current },
                StoreError::Storage(err) => {
                    tracing::error!(id = %session.page.id, "Checked save failed: {:#}", err);
                    EditorError::Saving {
                        kind: DocumentKind::Pages,
                        id: session.page.id.clone(),
                    }
                }
            })?;

        self.after_page_saved(session, version).await;
        Ok(version)
    }

    /// Validates and saves a flat document. A blank id is replaced with a
    /// fresh UUID; the saved document is returned.
    pub async fn save<D: Document>(&self, mut doc: D) -> Result<D, EditorError> {
        if doc.id().trim().is_empty() {
            doc.set_id(uuid::Uuid::new_v4().to_string());
        }
        ensure_valid(&doc)?;

        if !self.service.persist(&doc).await {
            return Err(EditorError::Saving {
                kind: D::KIND,
                id: doc.id().to_string(),
            });
        }

        self.record_edit(D::KIND, doc.id(), EditAction::Saved).await;
        Ok(doc)
    }

    pub async fn delete<D: Document>(&self, id: &str) -> Result<(), EditorError> {
        if !self.service.remove::<D>(id).await {
            return Err(EditorError::Deleting {
                kind: D::KIND,
                id: id.to_string(),
            });
        }

        self.record_edit(D::KIND, id, EditAction::Deleted).await;
        Ok(())
    }

    /// Most recent first.
    pub async fn recent_edits(&self) -> Vec<RecentEdit> {
        match self
            .service
            .store()
            .read_value::<Vec<RecentEdit>>(RECENT_EDITS_SUFFIX)
            .await
        {
            Ok(edits) => edits.unwrap_or_default(),
            Err(e) => {
                tracing::error!("Error loading recent edits: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn after_page_saved(&self, session: &mut PageSession, version: u64) {
        session.loaded_version = version;

        match serde_json::to_string(&session.page) {
            Ok(raw) => {
                self.service
                    .bus()
                    .signal(format!("editor_{}", session.page.id), raw);
            }
            Err(e) => tracing::error!(id = %session.page.id, "Failed to serialize editor signal: {}", e),
        }

        self.record_edit(DocumentKind::Pages, &session.page.id, EditAction::Saved)
            .await;
    }

    // independent of the document write; a failure here is only logged
    async fn record_edit(&self, kind: DocumentKind, id: &str, action: EditAction) {
        let mut edits = self.recent_edits().await;
        edits.insert(
            0,
            RecentEdit {
                kind,
                id: id.to_string(),
                action,
                edited_at: Utc::now(),
            },
        );
        edits.truncate(RECENT_EDITS_LIMIT);

        if let Err(e) = self
            .service
            .store()
            .write_value(RECENT_EDITS_SUFFIX, &edits)
            .await
        {
            tracing::error!(%kind, id, "Failed to record edit: {:#}", e);
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    details.join("; ")
}

fn ensure_valid<D: Document>(doc: &D) -> Result<(), EditorError> {
    let errors = doc.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(kind = %D::KIND, id = doc.id(), count = errors.len(), "Rejected invalid document");
        Err(EditorError::Validation(errors))
    }
}
