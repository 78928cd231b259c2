use crate::AppState;
use crate::domain::Document;
use crate::services::remote::WriteAck;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

// generic handlers, instantiated once per document kind in `api_router`

pub async fn list_documents<D: Document>(State(state): State<AppState>) -> Json<Vec<D>> {
    Json(state.content.store().get_all_documents::<D>().await)
}

pub async fn get_document<D: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<D>, StatusCode> {
    match state.content.store().get_document::<D>(&id).await {
        Some(doc) => Ok(Json(doc)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

pub async fn save_document<D: Document>(
    State(state): State<AppState>,
    Json(doc): Json<D>,
) -> (StatusCode, Json<WriteAck>) {
    let success = state.content.persist(&doc).await;
    (write_status(success), Json(WriteAck { success }))
}

pub async fn delete_document<D: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> (StatusCode, Json<WriteAck>) {
    let success = state.content.remove::<D>(&id).await;
    (write_status(success), Json(WriteAck { success }))
}

fn write_status(success: bool) -> StatusCode {
    if success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
