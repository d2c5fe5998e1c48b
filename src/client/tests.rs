use crate::client::AvatarClient;
use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::AvatarError;
use crate::models::{format, gender};

use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::net::TcpListener;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, output_dir: &Path) -> AvatarClient {
    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_output_dir(output_dir);
    AvatarClient::new(config).unwrap()
}

fn dir_entries(dir: &TempDir) -> Vec<String> {
    fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect()
}

#[test]
fn empty_base_url_uses_default_endpoint() {
    let client = AvatarClient::with_base_url("").unwrap();
    assert_eq!(client.config().base_url, DEFAULT_BASE_URL);
}

#[tokio::test]
async fn connectivity_returns_body_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let body = client_for(&server, dir.path()).test_connectivity().await.unwrap();

    assert_eq!(body, "OK");
}

#[tokio::test]
async fn connectivity_reports_status_on_503() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let error = client_for(&server, dir.path())
        .test_connectivity()
        .await
        .unwrap_err();

    assert!(matches!(error, AvatarError::RequestFailed { status: Some(503), .. }));
    assert_eq!(error.to_string(), "Request failed in test_connectivity: status 503");
}

#[tokio::test]
async fn connectivity_requires_exactly_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let error = client_for(&server, dir.path())
        .test_connectivity()
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(204));
}

#[tokio::test]
async fn unreachable_service_is_a_request_failure() {
    // Nothing listens on a port once its listener is dropped.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig::new().with_base_url(format!("http://127.0.0.1:{}", port));
    let error = AvatarClient::new(config)
        .unwrap()
        .test_connectivity()
        .await
        .unwrap_err();

    assert!(matches!(error, AvatarError::RequestFailed { status: None, .. }));
}

#[tokio::test]
async fn api_status_decodes_test_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "AvatarPyCor API is running!",
            "endpoints": ["GET /test"]
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let status = client_for(&server, dir.path()).api_status().await.unwrap();

    assert_eq!(status.status, "success");
    assert_eq!(status.endpoints, vec!["GET /test".to_string()]);
}

#[tokio::test]
async fn generate_posts_json_and_echoes_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/avatar/generate"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"size": 300, "gender": "1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"svg": "<svg></svg>", "size": 300, "gender": "1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let response = client_for(&server, dir.path())
        .generate_avatar(300, gender::MALE)
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.data.size, 300);
    assert_eq!(response.data.gender, "1");
    assert_eq!(response.data.svg, "<svg></svg>");
}

#[tokio::test]
async fn generate_leaves_server_failures_to_the_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/avatar/generate"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"success": false, "error": "boom"})),
        )
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let response = client_for(&server, dir.path())
        .generate_avatar(300, gender::MALE)
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("boom"));
}

#[tokio::test]
async fn generate_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/avatar/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let error = client_for(&server, dir.path())
        .generate_avatar(300, gender::MALE)
        .await
        .unwrap_err();

    assert!(matches!(error, AvatarError::DecodeError { operation: "generate_avatar", .. }));
}

#[tokio::test]
async fn save_writes_body_verbatim() {
    let server = MockServer::start().await;
    let svg = b"<svg xmlns=\"http://www.w3.org/2000/svg\"></svg>".to_vec();
    Mock::given(method("POST"))
        .and(path("/avatar/save"))
        .and(body_json(json!({
            "size": 280, "gender": "2", "format": "svg", "filename": "female_avatar"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(svg.clone()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let saved = client_for(&server, dir.path())
        .save_avatar(280, gender::FEMALE, format::SVG, "female_avatar")
        .await
        .unwrap();

    assert_eq!(saved, dir.path().join("female_avatar.svg"));
    assert_eq!(fs::read(&saved).unwrap(), svg);
}

#[tokio::test]
async fn save_with_empty_filename_uses_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/avatar/save"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let before = chrono::Utc::now().timestamp();
    let saved = client_for(&server, dir.path())
        .save_avatar(400, gender::UNSET, format::PNG, "")
        .await
        .unwrap();
    let after = chrono::Utc::now().timestamp();

    let name = saved.file_name().unwrap().to_string_lossy().to_string();
    let timestamp: i64 = name
        .strip_prefix("avatar_")
        .and_then(|rest| rest.strip_suffix(".png"))
        .unwrap()
        .parse()
        .unwrap();
    assert!(before <= timestamp && timestamp <= after);

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["filename"], json!(format!("avatar_{}", timestamp)));
}

#[tokio::test]
async fn save_failure_keeps_status_and_body_without_writing() {
    let server = MockServer::start().await;
    let body = r#"{"success":false,"error":"PNG conversion requires cairosvg"}"#;
    Mock::given(method("POST"))
        .and(path("/avatar/save"))
        .respond_with(ResponseTemplate::new(400).set_body_string(body))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("random_avatar.png"), b"previous").unwrap();

    let error = client_for(&server, dir.path())
        .save_avatar(400, gender::UNSET, format::PNG, "random_avatar")
        .await
        .unwrap_err();

    match error {
        AvatarError::SaveFailed { status, body: text, .. } => {
            assert_eq!(status, 400);
            assert_eq!(text, body);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(fs::read(dir.path().join("random_avatar.png")).unwrap(), b"previous");
    assert_eq!(dir_entries(&dir), vec!["random_avatar.png".to_string()]);
}

#[tokio::test]
async fn save_into_missing_directory_is_a_file_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/avatar/save"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<svg/>"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let error = client_for(&server, &missing)
        .save_avatar(280, gender::FEMALE, format::SVG, "female_avatar")
        .await
        .unwrap_err();

    assert!(matches!(error, AvatarError::FileError { operation: "save_avatar", .. }));
}

#[tokio::test]
async fn batch_save_writes_archive() {
    let server = MockServer::start().await;
    let archive: Vec<u8> = vec![0x50, 0x4b, 0x03, 0x04, 0x00, 0xff, 0x10, 0x00];
    Mock::given(method("POST"))
        .and(path("/avatar/save/batch"))
        .and(body_json(json!({"amount": 3, "size": 200, "gender": "1", "format": "svg"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let saved = client_for(&server, dir.path())
        .batch_save_avatars(3, 200, gender::MALE, format::SVG)
        .await
        .unwrap();

    let name = saved.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("avatars_svg_"), "unexpected name: {}", name);
    assert!(name.ends_with(".zip"), "unexpected name: {}", name);
    assert!(name["avatars_svg_".len()..name.len() - ".zip".len()]
        .parse::<i64>()
        .is_ok());
    assert_eq!(fs::read(&saved).unwrap(), archive);
}

#[tokio::test]
async fn batch_save_failure_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/avatar/save/batch"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let error = client_for(&server, dir.path())
        .batch_save_avatars(2, 300, gender::FEMALE, format::PNG)
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(500));
    assert!(dir_entries(&dir).is_empty());
}

#[tokio::test]
async fn batch_avatars_writes_svg_archive() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/avatar/batch"))
        .and(body_json(json!({"amount": 5, "size": 280, "gender": "0"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x05\x06".to_vec()))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let saved = client_for(&server, dir.path())
        .batch_avatars(5, 280, gender::UNSET)
        .await
        .unwrap();

    let name = saved.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("avatars_") && name.ends_with(".zip"));
    assert_eq!(fs::read(&saved).unwrap(), b"PK\x05\x06");
}

#[tokio::test]
async fn json_fetch_sends_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/avatar/json"))
        .and(query_param("size", "250"))
        .and(query_param("gender", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"svg": "<svg/>", "size": 250, "gender": "0"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let response = client_for(&server, dir.path())
        .get_avatar_json(250, gender::UNSET)
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.data.size, 250);
    assert_eq!(response.data.gender, "0");
}

#[tokio::test]
async fn json_fetch_rejects_wrong_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/avatar/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let error = client_for(&server, dir.path())
        .get_avatar_json(250, gender::UNSET)
        .await
        .unwrap_err();

    assert!(matches!(error, AvatarError::DecodeError { .. }));
}

#[tokio::test]
async fn svg_fetch_returns_markup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/avatar/one"))
        .and(query_param("renderer", "svg"))
        .and(query_param("size", "280"))
        .and(query_param("gender", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/svg+xml")
                .set_body_string("<svg/>"),
        )
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let svg = client_for(&server, dir.path())
        .get_avatar_svg(280, gender::FEMALE)
        .await
        .unwrap();

    assert_eq!(svg, "<svg/>");
}

#[tokio::test]
async fn client_lists_its_artifacts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/avatar/save"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<svg/>"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let client = client_for(&server, dir.path());
    client
        .save_avatar(280, gender::FEMALE, format::SVG, "female_avatar")
        .await
        .unwrap();

    let artifacts = client.list_artifacts().await.unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].name, "female_avatar.svg");
    assert_eq!(artifacts[0].size, 6);
}
