//! HTTP client behaviour against a mocked dashboard API.

use httpmock::prelude::*;
use serde_json::json;
use vpsdash::api::{ApiClient, ClientOptions, Reply, Request};
use vpsdash::error::ApiError;
use vpsdash::types::{NewTask, Priority, ServiceAction, TaskFilter};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.base_url(), &ClientOptions::default()).expect("client")
}

#[tokio::test]
async fn status_snapshot_decodes() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/status");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "system": {"cpu_percent": 42.7, "memory_percent": 60.1, "disk_percent": 10},
                "services": [{"id": "ssh", "name": "SSH", "running": true, "port": 22}],
                "battery": {"percentage": 81, "status": "CHARGING"},
                "uptime": "3h 12m"
            }));
    });

    let status = client(&server).status().await.expect("status");
    mock.assert();
    assert_eq!(status.system.cpu_percent, 42.7);
    assert_eq!(status.services[0].port, 22);
    assert_eq!(status.battery_percentage(), Some(81));
    assert_eq!(status.uptime.as_deref(), Some("3h 12m"));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/status");
        then.status(502);
    });

    let err = client(&server).status().await.expect_err("502 should fail");
    assert!(matches!(err, ApiError::Status(s) if s.as_u16() == 502));
}

#[tokio::test]
async fn task_list_sends_filter_query() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/todos")
            .query_param("filter", "active");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([
                {"id": "1", "title": "Buy milk", "completed": false, "priority": "high",
                 "category": "shopping", "category_name": "Shopping", "category_color": "#f59e0b"}
            ]));
    });

    let reply = client(&server)
        .execute(Request::ListTasks {
            filter: TaskFilter::Active,
        })
        .await;
    mock.assert();
    match reply {
        Reply::Tasks { filter, result } => {
            assert_eq!(filter, TaskFilter::Active);
            let tasks = result.expect("tasks");
            assert_eq!(tasks[0].priority, Priority::High);
            assert_eq!(tasks[0].category_name.as_deref(), Some("Shopping"));
        }
        other => panic!("unexpected reply {other:?}"),
    }
}

#[tokio::test]
async fn unsuccessful_ack_is_a_rejection() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/todos/7/toggle");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"success": false, "error": "Todo not found"}));
    });

    let err = client(&server).toggle_task("7").await.expect_err("rejected");
    assert_eq!(err.rejection_reason(), Some("Todo not found"));
}

#[tokio::test]
async fn error_body_with_bad_status_still_reads_the_reason() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/downloads");
        then.status(400)
            .header("content-type", "application/json")
            .json_body(json!({"success": false, "error": "URL is required"}));
    });

    let err = client(&server)
        .create_download(&vpsdash::types::NewDownload { url: String::new() })
        .await
        .expect_err("rejected");
    assert!(matches!(err, ApiError::Rejected(Some(ref r)) if r == "URL is required"));
}

#[tokio::test]
async fn create_task_posts_json_body() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/todos")
            .json_body(json!({"title": "Call bank", "priority": "low", "category": "personal"}));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"success": true, "id": "9"}));
    });

    let ack = client(&server)
        .create_task(&NewTask {
            title: "Call bank".into(),
            priority: Priority::Low,
            category: "personal".into(),
        })
        .await
        .expect("created");
    mock.assert();
    assert_eq!(ack.id.as_deref(), Some("9"));
}

#[tokio::test]
async fn service_action_hits_the_action_path() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/service/nginx/restart");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"success": true}));
    });

    client(&server)
        .service_action("nginx", ServiceAction::Restart)
        .await
        .expect("restarted");
    mock.assert();
}

#[tokio::test]
async fn artifact_is_streamed_to_disk() {
    let server = MockServer::start_async().await;
    let payload = vec![7u8; 64 * 1024];
    let body = payload.clone();
    server.mock(move |when, then| {
        when.method(GET).path("/api/downloads/abc/file");
        then.status(200).body(body.clone());
    });

    let dir = tempfile::tempdir().unwrap();
    let reply = client(&server)
        .execute(Request::SaveArtifact {
            id: "abc".into(),
            filename: "../../etc/ubuntu.iso".into(),
            dir: dir.path().to_path_buf(),
        })
        .await;
    let Reply::ArtifactSaved { id, result } = reply else {
        panic!("unexpected reply");
    };
    assert_eq!(id, "abc");
    let path = result.expect("saved");
    assert_eq!(path, dir.path().join("ubuntu.iso"));
    assert_eq!(std::fs::read(&path).unwrap(), payload);
    assert!(!dir.path().join("ubuntu.iso.part").exists());
}

#[tokio::test]
async fn missing_artifact_writes_nothing() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/downloads/gone/file");
        then.status(404);
    });

    let dir = tempfile::tempdir().unwrap();
    let err = client(&server)
        .save_artifact("gone", "gone.bin", dir.path())
        .await
        .expect_err("404");
    assert!(matches!(err, ApiError::Status(s) if s.as_u16() == 404));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn base_url_must_be_http() {
    assert!(ApiClient::new("ws://phone:5000", &ClientOptions::default()).is_err());
    assert!(ApiClient::new("not a url", &ClientOptions::default()).is_err());
    assert!(ApiClient::new("http://phone:5000", &ClientOptions::default()).is_ok());
}
