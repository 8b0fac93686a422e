//! Unit tests for agent start, stop and directory announcements.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::agent::{
    adapters::LocalBridge,
    error::AgentError,
    ports::{DirectoryError, HttpSurfaceError, InboundChannel},
    services::{Agent, AgentService},
    tests::doubles::{MockDirectory, MockSurface, permissive_surface, surface_addr},
};
use crate::config::AgentConfig;
use crate::conversation::{
    adapters::memory::InMemoryConversationRepository,
    domain::{ConversationId, Message, MessageId, Role},
};
use mockable::DefaultClock;
use rstest::rstest;

type TestAgent = Agent<InMemoryConversationRepository, DefaultClock>;

fn config(heartbeat_interval_secs: u64) -> AgentConfig {
    AgentConfig {
        heartbeat_interval_secs,
        ..AgentConfig::new("agent-1", "Test Agent")
    }
}

fn agent_with(surface: MockSurface, bridge: &LocalBridge, heartbeat_secs: u64) -> TestAgent {
    Agent::new(
        Arc::new(AgentService::in_memory(config(heartbeat_secs))),
        Arc::new(bridge.clone()),
        Arc::new(surface),
    )
}

fn message(id: &str) -> Message {
    Message::builder(ConversationId::new("c1"), Role::User)
        .with_id(MessageId::new(id))
        .with_text("hello")
        .build(&DefaultClock)
}

async fn wait_for_count(agent: &TestAgent, expected: u64) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while agent.service().message_count() < expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("inbound worker should drain the queue");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_runs_collaborators_and_advertises_bound_address() {
    let bridge = LocalBridge::new();
    let agent = agent_with(permissive_surface(), &bridge, 0);

    agent.start().await.expect("start succeeds");

    assert!(agent.is_running());
    assert!(bridge.is_running());
    assert_eq!(agent.local_addr(), Some(surface_addr()));
    assert_eq!(agent.status().endpoints.base_url, "http://127.0.0.1:4000");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_on_running_agent_is_a_no_op() {
    let mut surface = MockSurface::new();
    surface
        .expect_start()
        .times(1)
        .returning(|| Ok(surface_addr()));
    let bridge = LocalBridge::new();
    let agent = agent_with(surface, &bridge, 0);

    agent.start().await.expect("first start succeeds");
    agent.start().await.expect("second start succeeds");

    assert!(agent.is_running());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn http_start_failure_leaves_agent_stopped() {
    let mut surface = MockSurface::new();
    surface.expect_start().times(1).returning(|| {
        Err(HttpSurfaceError::server(std::io::Error::other(
            "address in use",
        )))
    });
    let bridge = LocalBridge::new();
    let agent = agent_with(surface, &bridge, 0);

    let err = agent.start().await.expect_err("start should fail");

    assert!(matches!(err, AgentError::Http(_)));
    assert!(!agent.is_running());
    assert!(!bridge.is_running());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stop_is_idempotent() {
    let mut surface = MockSurface::new();
    surface.expect_start().returning(|| Ok(surface_addr()));
    surface.expect_stop().times(1).returning(|| Ok(()));
    let bridge = LocalBridge::new();
    let agent = agent_with(surface, &bridge, 0);

    agent.stop().await.expect("stopping a new agent succeeds");
    agent.start().await.expect("start succeeds");
    agent.stop().await.expect("first stop succeeds");
    agent.stop().await.expect("second stop succeeds");

    assert!(!agent.is_running());
    assert!(!bridge.is_running());
    assert_eq!(agent.status().uptime, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stop_reports_surface_error_after_stopping_everything() {
    let mut surface = MockSurface::new();
    surface.expect_start().returning(|| Ok(surface_addr()));
    surface.expect_stop().times(1).returning(|| {
        Err(HttpSurfaceError::server(std::io::Error::other(
            "drain failed",
        )))
    });
    let bridge = LocalBridge::new();
    let agent = agent_with(surface, &bridge, 0);
    agent.start().await.expect("start succeeds");

    let err = agent.stop().await.expect_err("stop should report the error");

    assert!(matches!(err, AgentError::Http(_)));
    assert!(!agent.is_running());
    assert!(!bridge.is_running());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restart_cycles_collaborators() {
    let mut surface = MockSurface::new();
    surface
        .expect_start()
        .times(2)
        .returning(|| Ok(surface_addr()));
    surface.expect_stop().times(1).returning(|| Ok(()));
    let bridge = LocalBridge::new();
    let agent = agent_with(surface, &bridge, 0);

    agent.start().await.expect("start succeeds");
    agent.restart().await.expect("restart succeeds");

    assert!(agent.is_running());
    assert!(bridge.is_running());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directory_failure_does_not_abort_startup() {
    let mut directory = MockDirectory::new();
    directory.expect_register().times(1).returning(|_| {
        Err(DirectoryError::Status {
            status: 503,
            body: "unavailable".to_owned(),
        })
    });
    directory.expect_unregister().times(0);
    let bridge = LocalBridge::new();
    let agent = agent_with(permissive_surface(), &bridge, 0).with_directory(Arc::new(directory));

    agent.start().await.expect("start succeeds despite directory");
    assert!(agent.is_running());
    agent.stop().await.expect("stop succeeds");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_agent_unregisters_on_stop() {
    let mut directory = MockDirectory::new();
    directory
        .expect_register()
        .withf(|registration| {
            registration.agent_id == "agent-1"
                && registration.endpoint == "http://127.0.0.1:4000"
                && registration.improvers.contains(&"default".to_owned())
        })
        .times(1)
        .returning(|_| Ok(()));
    directory
        .expect_unregister()
        .withf(|agent_id| agent_id == "agent-1")
        .times(1)
        .returning(|_| Ok(()));
    let bridge = LocalBridge::new();
    let agent = agent_with(permissive_surface(), &bridge, 0).with_directory(Arc::new(directory));

    agent.start().await.expect("start succeeds");
    agent.stop().await.expect("stop succeeds");
    agent.stop().await.expect("second stop does not unregister again");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn heartbeat_runs_while_started() {
    let beats = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&beats);
    let mut directory = MockDirectory::new();
    directory.expect_register().returning(|_| Ok(()));
    directory.expect_unregister().returning(|_| Ok(()));
    directory.expect_heartbeat().returning(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let bridge = LocalBridge::new();
    let agent = agent_with(permissive_surface(), &bridge, 1).with_directory(Arc::new(directory));

    agent.start().await.expect("start succeeds");
    tokio::time::timeout(Duration::from_secs(5), async {
        while beats.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("a heartbeat should be sent");
    agent.stop().await.expect("stop succeeds");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bridged_messages_are_processed_in_order() {
    let bridge = LocalBridge::new();
    let agent = agent_with(permissive_surface(), &bridge, 0);
    agent.start().await.expect("start succeeds");

    assert_eq!(bridge.publish(message("m1")).expect("publish succeeds"), 1);
    assert_eq!(bridge.publish(message("m2")).expect("publish succeeds"), 1);
    wait_for_count(&agent, 2).await;

    let conversation = agent
        .service()
        .conversation(&ConversationId::new("c1"))
        .await
        .expect("lookup succeeds")
        .expect("conversation exists");
    let ids: Vec<&str> = conversation
        .messages()
        .iter()
        .map(|m| m.id().as_str())
        .collect();
    assert_eq!(ids, vec!["m1", "m2"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn worker_survives_restart() {
    let bridge = LocalBridge::new();
    let agent = agent_with(permissive_surface(), &bridge, 0);
    agent.start().await.expect("start succeeds");
    agent.restart().await.expect("restart succeeds");

    bridge.publish(message("m1")).expect("publish succeeds");
    wait_for_count(&agent, 1).await;
}
