use crate::domain::{
    BilingualText, MediaItem, NewsItem, Page, TeamMember, Testimonial, testimonial,
};
use crate::seed;
use derive_more::derive::Display;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// How a kind's documents are laid out inside its storage blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobLayout {
    // JSON object keyed by document id
    Map,
    // JSON array
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[display("pages")]
    Pages,
    #[display("news")]
    News,
    #[display("team")]
    Team,
    #[display("testimonials")]
    Testimonials,
    #[display("media")]
    Media,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::Pages,
        DocumentKind::News,
        DocumentKind::Team,
        DocumentKind::Testimonials,
        DocumentKind::Media,
    ];

    pub fn storage_key(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self)
    }

    pub fn layout(&self) -> BlobLayout {
        match self {
            DocumentKind::Pages => BlobLayout::Map,
            _ => BlobLayout::List,
        }
    }

    /// Key of the storage-change signal emitted when a document of this kind
    /// is written, e.g. `page_home`.
    pub fn signal_key(&self, id: &str) -> String {
        format!("{}_{}", self.singular(), id)
    }

    pub fn singular(&self) -> &'static str {
        match self {
            DocumentKind::Pages => "page",
            DocumentKind::News => "news",
            DocumentKind::Team => "team",
            DocumentKind::Testimonials => "testimonial",
            DocumentKind::Media => "media",
        }
    }

    /// Remote path listing every document of the kind.
    pub fn collection_path(&self) -> &'static str {
        match self {
            DocumentKind::Pages => "/pages",
            DocumentKind::News => "/news",
            DocumentKind::Team => "/team",
            DocumentKind::Testimonials => "/testimonials",
            DocumentKind::Media => "/media",
        }
    }

    /// Remote path accepting a POSTed document.
    pub fn write_path(&self) -> &'static str {
        match self {
            DocumentKind::Pages => "/page",
            DocumentKind::News => "/news",
            DocumentKind::Team => "/team",
            DocumentKind::Testimonials => "/testimonial",
            DocumentKind::Media => "/media",
        }
    }

    /// Remote path for a single document, when the API exposes one.
    pub fn item_path(&self, id: &str) -> Option<String> {
        match self {
            DocumentKind::Pages => Some(format!("/page/{}", id)),
            DocumentKind::News => Some(format!("/news/{}", id)),
            _ => None,
        }
    }

    /// Remote path deleting a single document, when the API exposes one.
    pub fn delete_path(&self, id: &str) -> Option<String> {
        match self {
            DocumentKind::Team => Some(format!("/team/{}", id)),
            DocumentKind::Testimonials => Some(format!("/testimonial/{}", id)),
            DocumentKind::Media => Some(format!("/media/{}", id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{field}: {problem}")]
pub struct FieldError {
    pub field: String,
    pub problem: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            problem: problem.into(),
        }
    }
}

fn require_bilingual(errors: &mut Vec<FieldError>, field: &str, text: &BilingualText) {
    let missing = text.missing_locales();
    if !missing.is_empty() {
        let locales: Vec<String> = missing.iter().map(|l| l.to_string()).collect();
        errors.push(FieldError::new(
            field,
            format!("missing translation ({})", locales.join(", ")),
        ));
    }
}

fn require_id(errors: &mut Vec<FieldError>, id: &str) {
    if id.trim().is_empty() {
        errors.push(FieldError::new("id", "must not be blank"));
    }
}

/// A top-level document persisted by the content store.
///
/// Each implementor owns one storage blob, chosen by `KIND`.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: DocumentKind;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Checks the fields an editor must fill before saving. The store itself
    /// never calls this.
    fn validate(&self) -> Vec<FieldError>;

    /// Built-in documents written on first initialization.
    fn defaults() -> Vec<Self>;
}

impl Document for Page {
    const KIND: DocumentKind = DocumentKind::Pages;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_id(&mut errors, &self.id);
        require_bilingual(&mut errors, "title", &self.title);
        for section in &self.sections {
            require_bilingual(
                &mut errors,
                &format!("sections.{}.title", section.id),
                &section.title,
            );
        }
        errors
    }

    fn defaults() -> Vec<Self> {
        seed::default_pages()
    }
}

impl Document for NewsItem {
    const KIND: DocumentKind = DocumentKind::News;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_id(&mut errors, &self.id);
        require_bilingual(&mut errors, "title", &self.title);
        require_bilingual(&mut errors, "content", &self.content);
        errors
    }

    fn defaults() -> Vec<Self> {
        seed::default_news()
    }
}

impl Document for TeamMember {
    const KIND: DocumentKind = DocumentKind::Team;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_id(&mut errors, &self.id);
        require_bilingual(&mut errors, "name", &self.name);
        require_bilingual(&mut errors, "role", &self.role);
        errors
    }

    fn defaults() -> Vec<Self> {
        seed::default_team()
    }
}

impl Document for Testimonial {
    const KIND: DocumentKind = DocumentKind::Testimonials;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_id(&mut errors, &self.id);
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "must not be blank"));
        }
        require_bilingual(&mut errors, "content", &self.content);
        if !(testimonial::MIN_RATING..=testimonial::MAX_RATING).contains(&self.rating) {
            errors.push(FieldError::new(
                "rating",
                format!(
                    "must be between {} and {}",
                    testimonial::MIN_RATING,
                    testimonial::MAX_RATING
                ),
            ));
        }
        errors
    }

    fn defaults() -> Vec<Self> {
        seed::default_testimonials()
    }
}

impl Document for MediaItem {
    const KIND: DocumentKind = DocumentKind::Media;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_id(&mut errors, &self.id);
        require_bilingual(&mut errors, "title", &self.title);
        if self.url.trim().is_empty() {
            errors.push(FieldError::new("url", "must not be blank"));
        }
        errors
    }

    fn defaults() -> Vec<Self> {
        seed::default_media()
    }
}
