use crate::domain::{NewsItem, Page, Testimonial};
use crate::seed;
use crate::services::remote::{RemoteClient, UploadFile};
use crate::tests::mocks::MockTransport;
use http::StatusCode;

fn client(transport: &MockTransport) -> RemoteClient {
    RemoteClient::new(Box::new(transport.clone()))
}

fn upload_file() -> UploadFile {
    UploadFile {
        filename: "affiche.png".into(),
        content_type: "image/png".into(),
        bytes: vec![1, 2, 3],
    }
}

#[tokio::test]
async fn test_upload_returns_assigned_url() {
    let transport = MockTransport::new();
    transport.respond(
        "UPLOAD",
        "/upload",
        StatusCode::OK,
        r#"{"success":true,"url":"/uploads/abc.png"}"#,
    );

    let url = client(&transport).upload(upload_file()).await;

    assert_eq!(url.as_deref(), Some("/uploads/abc.png"));
}

// success without a url, an explicit failure, or a bad status are all None
#[tokio::test]
async fn test_upload_failures() {
    let transport = MockTransport::new();
    let remote = client(&transport);

    transport.respond("UPLOAD", "/upload", StatusCode::OK, r#"{"success":true}"#);
    assert!(remote.upload(upload_file()).await.is_none());

    transport.respond("UPLOAD", "/upload", StatusCode::OK, r#"{"success":false}"#);
    assert!(remote.upload(upload_file()).await.is_none());

    transport.respond("UPLOAD", "/upload", StatusCode::PAYLOAD_TOO_LARGE, "");
    assert!(remote.upload(upload_file()).await.is_none());
}

#[tokio::test]
async fn test_write_acknowledgement() {
    let transport = MockTransport::new();
    let remote = client(&transport);
    let testimonial = seed::default_testimonials().remove(0);

    transport.respond("POST", "/testimonial", StatusCode::OK, r#"{"success":true}"#);
    assert!(remote.save_document(&testimonial).await);

    // a 200 that says no is still a no
    transport.respond("POST", "/testimonial", StatusCode::OK, r#"{"success":false}"#);
    assert!(!remote.save_document(&testimonial).await);

    transport.respond("POST", "/testimonial", StatusCode::SERVICE_UNAVAILABLE, "");
    assert!(!remote.save_document(&testimonial).await);

    transport.respond("POST", "/testimonial", StatusCode::OK, "ok");
    assert!(!remote.save_document(&testimonial).await);
}

// the API has no page delete endpoint, so nothing is sent
#[tokio::test]
async fn test_delete_without_endpoint() {
    let transport = MockTransport::new();

    assert!(!client(&transport).delete_document::<Page>("home").await);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_delete_with_endpoint() {
    let transport = MockTransport::new();
    transport.respond(
        "DELETE",
        "/testimonial/testimonial-1",
        StatusCode::OK,
        r#"{"success":true}"#,
    );

    assert!(client(&transport)
        .delete_document::<Testimonial>("testimonial-1")
        .await);
}

#[tokio::test]
async fn test_fetch_all() {
    let transport = MockTransport::new();
    let news = seed::default_news();
    transport.respond(
        "GET",
        "/news",
        StatusCode::OK,
        &serde_json::to_string(&news).unwrap(),
    );

    let fetched = client(&transport).fetch_all::<NewsItem>().await;

    assert_eq!(fetched, Some(news));
}

#[tokio::test]
async fn test_offline_remote() {
    let transport = MockTransport::new();
    transport.go_offline();
    let remote = client(&transport);

    assert!(remote.fetch_document::<Page>("home").await.is_none());
    assert!(!remote.save_document(&seed::default_news().remove(0)).await);
    assert!(remote.upload(upload_file()).await.is_none());
}
