use crate::AppState;
use crate::services::remote::UploadAck;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};

pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const FILE_FIELD: &str = "file";

pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<UploadAck>) {
    let failed = |status: StatusCode| {
        (
            status,
            Json(UploadAck {
                success: false,
                url: None,
            }),
        )
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Malformed multipart upload: {}", e);
                return failed(StatusCode::BAD_REQUEST);
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(original_name = %original_name, "Failed to read upload body: {}", e);
                return failed(StatusCode::BAD_REQUEST);
            }
        };

        return match state.uploads.store(&original_name, &bytes).await {
            Ok(url) => (
                StatusCode::OK,
                Json(UploadAck {
                    success: true,
                    url: Some(url),
                }),
            ),
            Err(e) => {
                tracing::error!(original_name = %original_name, "Failed to store upload: {:#}", e);
                failed(StatusCode::INTERNAL_SERVER_ERROR)
            }
        };
    }

    tracing::warn!("Upload request had no '{}' field", FILE_FIELD);
    failed(StatusCode::BAD_REQUEST)
}
