//! Tests for the VergeOS API client against a local HTTP responder.

use serde_json::Value;
use std::time::Duration;
use vrg::client::{Auth, VergeClient};
use vrg::error::{exit_code, VrgError};
use vrg::snapshot::{CreateSnapshotOptions, ListFilter, SnapshotManager};

use super::support::OneShotServer;

fn client(url: &str) -> VergeClient {
    VergeClient::new(
        url,
        Auth::Token("secret-token".to_string()),
        true,
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_list_sends_token_and_name_filter() {
    let server = OneShotServer::start(vec![(
        200,
        r#"[{"$key": "12", "name": "o'brien", "expires": 0, "immutable": true}]"#,
    )]);
    let api = client(&server.url);
    let snapshots = api
        .list(Some(&ListFilter::by_name("o'brien")))
        .await
        .unwrap();
    let requests = server.finish();

    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].key, 12);
    assert!(snapshots[0].immutable);

    let request = &requests[0];
    assert!(request.request_line.starts_with("GET /api/v4/cloud_snapshots?"));
    assert!(request.request_line.contains("filter=name+eq+%27o%27%27brien%27"));
    assert_eq!(request.header("x-yottabyte-token"), Some("secret-token"));
}

#[tokio::test]
async fn test_get_404_is_not_found() {
    let server = OneShotServer::start(vec![(404, r#"{"err": "no such row"}"#)]);
    let err = client(&server.url).get(42).await.unwrap_err();
    let requests = server.finish();

    assert!(requests[0].request_line.starts_with("GET /api/v4/cloud_snapshots/42"));
    assert!(matches!(err, VrgError::NotFound { .. }));
    assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
}

#[tokio::test]
async fn test_status_mapping() {
    let server = OneShotServer::start(vec![
        (401, r#"{"err": "bad token"}"#),
        (403, r#"{"err": "denied"}"#),
        (500, "boom"),
    ]);
    let api = client(&server.url);
    let auth = api.delete(1).await.unwrap_err();
    let forbidden = api.delete(1).await.unwrap_err();
    let server_error = api.delete(1).await.unwrap_err();
    server.finish();

    assert_eq!(auth.exit_code(), exit_code::AUTH);
    assert!(auth.to_string().contains("bad token"));
    assert_eq!(forbidden.exit_code(), exit_code::FORBIDDEN);
    assert!(matches!(server_error, VrgError::Api { status: 500, .. }));
    assert_eq!(server_error.exit_code(), exit_code::GENERAL);
}

#[tokio::test]
async fn test_create_posts_body_then_fetches_row() {
    let server = OneShotServer::start(vec![
        (201, r#"{"$key": "9"}"#),
        (
            200,
            r#"{"$key": 9, "name": "pre-upgrade", "status": "creating", "expires": 1900000000}"#,
        ),
    ]);
    let options =
        CreateSnapshotOptions::from_flags(Some("pre-upgrade"), Some(3600), false, false, true, false)
            .unwrap();
    let created = client(&server.url).create(&options).await.unwrap();
    let requests = server.finish();

    assert_eq!(created.key, 9);
    assert!(created.is_in_progress());

    assert!(requests[0].request_line.starts_with("POST /api/v4/cloud_snapshots"));
    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["name"], "pre-upgrade");
    assert_eq!(body["retention"], 3600);
    assert_eq!(body["private"], true);
    assert!(requests[1].request_line.starts_with("GET /api/v4/cloud_snapshots/9"));
}

#[tokio::test]
async fn test_vms_filtered_by_snapshot() {
    let server = OneShotServer::start(vec![(
        200,
        r#"[{"$key": 1, "name": "web01", "cpu_cores": 2, "ram": 2048}]"#,
    )]);
    let vms = client(&server.url).vms(5).await.unwrap();
    let requests = server.finish();

    assert_eq!(vms[0].name, "web01");
    assert_eq!(vms[0].ram, Some(2048));
    assert!(requests[0].request_line.starts_with("GET /api/v4/cloud_snapshot_vms?"));
    assert!(requests[0]
        .request_line
        .contains("filter=cloud_snapshot+eq+5"));
}

#[tokio::test]
async fn test_basic_auth_header() {
    let server = OneShotServer::start(vec![(200, "[]")]);
    let api = VergeClient::new(
        &server.url,
        Auth::Basic {
            username: "admin".to_string(),
            password: "pw".to_string(),
        },
        true,
        Duration::from_secs(5),
    )
    .unwrap();
    let tenants = api.tenants(3).await.unwrap();
    let requests = server.finish();

    assert!(tenants.is_empty());
    assert_eq!(requests[0].header("authorization"), Some("Basic YWRtaW46cHc="));
}
