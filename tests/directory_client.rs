//! Integration tests for [`HttpDirectoryClient`] against a mock directory.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use mockito::{Matcher, Server};
use parley::agent::{
    adapters::HttpDirectoryClient,
    domain::AgentRegistration,
    ports::{DirectoryClient, DirectoryError},
};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn registration() -> AgentRegistration {
    AgentRegistration {
        agent_id: "agent-1".to_owned(),
        name: "Test Agent".to_owned(),
        description: "Improves messages".to_owned(),
        version: "0.1.0".to_owned(),
        endpoint: "http://127.0.0.1:3000".to_owned(),
        capabilities: vec!["text-improvement".to_owned()],
        improvers: vec!["default".to_owned()],
    }
}

#[rstest]
#[tokio::test]
async fn register_posts_camel_case_registration(registration: AgentRegistration) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/agents/register")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "agentId": "agent-1",
            "endpoint": "http://127.0.0.1:3000",
            "improvers": ["default"]
        })))
        .with_status(201)
        .create_async()
        .await;

    let client = HttpDirectoryClient::new(&server.url()).expect("valid directory URL");
    client
        .register(&registration)
        .await
        .expect("registration should succeed");

    mock.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn routes_are_joined_under_base_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/directory/v1/agents/agent-1/heartbeat")
        .with_status(204)
        .create_async()
        .await;

    let client = HttpDirectoryClient::new(&format!("{}/directory/v1/", server.url()))
        .expect("valid directory URL");
    client
        .heartbeat("agent-1")
        .await
        .expect("heartbeat should succeed");

    mock.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn unregister_deletes_agent_entry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/agents/agent-1")
        .with_status(200)
        .create_async()
        .await;

    let client = HttpDirectoryClient::new(&server.url()).expect("valid directory URL");
    client
        .unregister("agent-1")
        .await
        .expect("unregister should succeed");

    mock.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn non_success_status_is_reported_with_body(registration: AgentRegistration) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/agents/register")
        .with_status(503)
        .with_body("directory offline")
        .create_async()
        .await;

    let client = HttpDirectoryClient::new(&server.url()).expect("valid directory URL");
    let err = client
        .register(&registration)
        .await
        .expect_err("503 should be an error");

    match err {
        DirectoryError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "directory offline");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    mock.assert_async().await;
}

#[rstest]
#[tokio::test]
async fn unreachable_directory_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind a free port");
    let url = format!("http://{}", listener.local_addr().expect("listener address"));
    drop(listener);

    let client = HttpDirectoryClient::new(&url).expect("valid directory URL");
    let err = client
        .heartbeat("agent-1")
        .await
        .expect_err("closed port should fail");

    assert!(matches!(err, DirectoryError::Transport(_)), "got {err:?}");
}

#[rstest]
#[case("not a url")]
#[case("ftp://directory.example")]
#[case("/relative/path")]
fn invalid_base_urls_are_rejected(#[case] base_url: &str) {
    let err = HttpDirectoryClient::new(base_url).expect_err("URL should be rejected");
    assert!(matches!(err, DirectoryError::InvalidUrl(_)), "got {err:?}");
}
