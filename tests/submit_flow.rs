//! End-to-end submissions against a local mock inference endpoint.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};
use tumor_scan::{
    AnalysisClient, Analyzer, EndpointConfig, FailureKind, Phase, Rendered, SelectedImage,
    ViewState,
};

#[derive(Debug, Clone)]
struct Upload {
    field: String,
    file_name: Option<String>,
    content_type: Option<String>,
    len: usize,
    bypass: Option<String>,
}

#[derive(Clone)]
struct Mock {
    uploads: Arc<Mutex<Vec<Upload>>>,
    reply: Reply,
}

#[derive(Clone, Copy)]
enum Reply {
    Verdict,
    ServerError,
    Slow,
    NotJson,
}

async fn analyze(
    State(mock): State<Mock>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> axum::response::Response {
    let bypass = headers
        .get("ngrok-skip-browser-warning")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    while let Some(field) = multipart.next_field().await.unwrap() {
        let upload = Upload {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            len: 0,
            bypass: bypass.clone(),
        };
        let data = field.bytes().await.unwrap();
        mock.uploads.lock().unwrap().push(Upload {
            len: data.len(),
            ..upload
        });
    }

    match mock.reply {
        Reply::Verdict => Json(json!({"tumor": false, "confidence": 0.92})).into_response(),
        Reply::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response(),
        Reply::Slow => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"late": true})).into_response()
        }
        Reply::NotJson => "<html>tunnel offline</html>".into_response(),
    }
}

async fn spawn_mock(reply: Reply) -> (SocketAddr, Arc<Mutex<Vec<Upload>>>) {
    let uploads = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route("/", post(analyze)).with_state(Mock {
        uploads: uploads.clone(),
        reply,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, uploads)
}

fn client_for(addr: SocketAddr) -> AnalysisClient {
    let config = EndpointConfig::new(&format!("http://{}/", addr))
        .unwrap()
        .with_timeout(Duration::from_millis(500));
    AnalysisClient::new(config).unwrap()
}

fn photo() -> SelectedImage {
    SelectedImage::new("photo.png", None, b"\x89PNG\r\n\x1a\nfake-pixels".to_vec())
}

#[tokio::test]
async fn successful_scan_is_rendered_verbatim() {
    let (addr, uploads) = spawn_mock(Reply::Verdict).await;
    let client = client_for(addr);
    let mut state = ViewState::default();

    state.select(photo());
    state.submit(&client).await;

    assert_eq!(state.phase(), Phase::Succeeded);
    assert!(!state.is_loading());
    assert_eq!(state.error(), None);
    let expected = serde_json::to_string_pretty(&json!({"tumor": false, "confidence": 0.92})).unwrap();
    assert_eq!(state.render(), Some(Rendered::Result(expected)));

    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    let upload = &uploads[0];
    assert_eq!(upload.field, "image");
    assert_eq!(upload.file_name.as_deref(), Some("photo.png"));
    assert_eq!(upload.content_type.as_deref(), Some("image/png"));
    assert_eq!(upload.len, 19);
    assert_eq!(upload.bypass.as_deref(), Some("69420"));
}

#[tokio::test]
async fn missing_image_makes_no_request() {
    let (addr, uploads) = spawn_mock(Reply::Verdict).await;
    let client = client_for(addr);
    let mut state = ViewState::default();

    state.submit(&client).await;

    assert_eq!(
        state.render(),
        Some(Rendered::Error("Please select an image first".into()))
    );
    assert!(uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn slow_endpoint_times_out_with_generic_message() {
    let (addr, _uploads) = spawn_mock(Reply::Slow).await;
    let client = client_for(addr);
    let mut state = ViewState::default();

    state.select(SelectedImage::new("scan.jpg", None, vec![0xFF, 0xD8, 0xFF, 0xE0]));
    state.submit(&client).await;

    assert!(!state.is_loading());
    assert_eq!(state.last_failure(), Some(FailureKind::Timeout));
    assert_eq!(
        state.render(),
        Some(Rendered::Error("Error processing image. Please try again.".into()))
    );
}

#[tokio::test]
async fn server_error_keeps_status_detail() {
    let (addr, _uploads) = spawn_mock(Reply::ServerError).await;
    let client = client_for(addr);

    let err = client.analyze(&photo()).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Status);
    assert_eq!(err.to_string(), "endpoint returned 500: model crashed");
}

#[tokio::test]
async fn non_json_body_is_a_decode_failure() {
    let (addr, _uploads) = spawn_mock(Reply::NotJson).await;
    let client = client_for(addr);
    let mut state = ViewState::default();

    state.select(photo());
    state.submit(&client).await;

    assert_eq!(state.phase(), Phase::Failed);
    assert_eq!(state.last_failure(), Some(FailureKind::Decode));
    assert_eq!(state.error(), Some("Error processing image. Please try again."));
}

#[tokio::test]
async fn refused_connection_is_a_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);
    let err = client.analyze(&photo()).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Network);
}

#[tokio::test]
async fn custom_field_and_headers_are_sent() {
    let (addr, uploads) = spawn_mock(Reply::Verdict).await;
    let config = EndpointConfig::new(&format!("http://{}/", addr))
        .unwrap()
        .without_headers()
        .with_field_name("scan");
    let client = AnalysisClient::new(config).unwrap();

    let payload: Value = client.analyze(&photo()).await.unwrap();

    assert_eq!(payload["tumor"], json!(false));
    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads[0].field, "scan");
    assert_eq!(uploads[0].bypass, None);
}
