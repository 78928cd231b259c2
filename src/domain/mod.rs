pub mod bilingual;
pub mod document;
pub mod media;
pub mod news;
pub mod page;
pub mod team;
pub mod testimonial;

pub use bilingual::{BilingualText, Locale};
pub use document::{BlobLayout, Document, DocumentKind, FieldError};
pub use media::{MediaItem, MediaType};
pub use news::NewsItem;
pub use page::{Direction, Page, Section};
pub use team::TeamMember;
pub use testimonial::Testimonial;
