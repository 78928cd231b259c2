pub mod documents;
pub mod upload;

use crate::AppState;
use crate::domain::{MediaItem, NewsItem, Page, TeamMember, Testimonial};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use documents::{delete_document, get_document, list_documents, save_document};

// the content API, nested under /api by the caller
pub fn api_router() -> Router<AppState> {
    Router::new()
        // pages
        .route("/pages", get(list_documents::<Page>))
        .route("/page", post(save_document::<Page>))
        .route("/page/{id}", get(get_document::<Page>))
        // news
        .route(
            "/news",
            get(list_documents::<NewsItem>).post(save_document::<NewsItem>),
        )
        .route("/news/{id}", get(get_document::<NewsItem>))
        // media
        .route(
            "/media",
            get(list_documents::<MediaItem>).post(save_document::<MediaItem>),
        )
        .route("/media/{id}", delete(delete_document::<MediaItem>))
        // testimonials
        .route("/testimonials", get(list_documents::<Testimonial>))
        .route("/testimonial", post(save_document::<Testimonial>))
        .route("/testimonial/{id}", delete(delete_document::<Testimonial>))
        // team
        .route(
            "/team",
            get(list_documents::<TeamMember>).post(save_document::<TeamMember>),
        )
        .route("/team/{id}", delete(delete_document::<TeamMember>))
        // uploads
        .route(
            "/upload",
            post(upload::upload_handler).layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES)),
        )
}
