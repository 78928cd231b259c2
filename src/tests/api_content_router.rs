use crate::AppState;
use crate::features::api_router;
use crate::io::local::LocalUploadStore;
use crate::tests::mocks::{mock_config, seeded_store, service_with};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use std::sync::Arc;

// helper to prepare the API over a seeded in-memory store
// the temp dir is returned so uploads live as long as the test
async fn setup_api_test_app() -> (Router, TempDir) {
    let upload_dir = tempfile::tempdir().unwrap();
    let config = mock_config(upload_dir.path().to_path_buf());

    let state = AppState {
        content: service_with(seeded_store().await, None),
        uploads: Arc::new(LocalUploadStore::new(
            config.upload_dir.clone(),
            config.public_upload_prefix.clone(),
        )),
    };

    (api_router().with_state(state), upload_dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_get_page_success() {
    let (app, _dir) = setup_api_test_app().await;

    let (status, json) = send(&app, get("/page/home")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "home");
    assert_eq!(json["title"]["ar"], "الرئيسية");
}

#[tokio::test]
async fn test_get_page_not_found() {
    let (app, _dir) = setup_api_test_app().await;

    let (status, _) = send(&app, get("/page/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_pages() {
    let (app, _dir) = setup_api_test_app().await;

    let (status, json) = send(&app, get("/pages")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().map(|a| a.len()), Some(4));
}

// a POSTed testimonial shows up in the listing
#[tokio::test]
async fn test_post_then_list_testimonial() {
    let (app, _dir) = setup_api_test_app().await;
    let testimonial = json!({
        "id": "t-api",
        "name": "Samir K.",
        "role": { "fr": "Bénéficiaire", "ar": "مستفيد" },
        "content": { "fr": "Très utile", "ar": "مفيد جدا" },
        "rating": 4,
        "date": "2024-06-01"
    });

    let (status, json) = send(&app, post_json("/testimonial", &testimonial)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true }));

    let (_, listing) = send(&app, get("/testimonials")).await;
    let ids: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["id"].as_str())
        .collect();
    assert!(ids.contains(&"t-api"));
}

// a body that is not the document shape is refused before reaching the store
#[tokio::test]
async fn test_post_malformed_document() {
    let (app, _dir) = setup_api_test_app().await;

    let (status, _) = send(&app, post_json("/page", &json!({ "nope": true }))).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_delete_media() {
    let (app, _dir) = setup_api_test_app().await;

    let (status, json) = send(&app, delete("/media/media-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (_, listing) = send(&app, get("/media")).await;
    assert!(listing
        .as_array()
        .unwrap()
        .iter()
        .all(|m| m["id"] != "media-1"));

    // deleting what is already gone still succeeds
    let (status, json) = send(&app, delete("/media/media-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn test_news_item_routes() {
    let (app, _dir) = setup_api_test_app().await;

    let (status, json) = send(&app, get("/news/news-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "news-1");

    // news has no delete endpoint
    let (status, _) = send(&app, delete("/news/news-1")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_upload_file() {
    let (app, dir) = setup_api_test_app().await;

    let boundary = "droitfpra-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"affiche.png\"\r\nContent-Type: image/png\r\n\r\nnot really a png\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    let url = json["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));

    let stored = dir.path().join(url.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(stored).unwrap(), b"not really a png");
}

// a multipart body without a "file" field is rejected
#[tokio::test]
async fn test_upload_without_file_field() {
    let (app, _dir) = setup_api_test_app().await;

    let boundary = "droitfpra-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}
