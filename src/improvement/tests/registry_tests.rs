//! Unit tests for the improver registry.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::conversation::domain::Metadata;
use crate::improvement::{
    domain::{
        DEFAULT_IMPROVER, IMPROVER_NOT_FOUND, ImprovementContext, ImprovementType,
        MessageImprovementResult,
    },
    error::{ImproverError, ImproverResult},
    ports::MessageImprover,
    services::ImproverRegistry,
};
use async_trait::async_trait;
use rstest::{fixture, rstest};

#[fixture]
fn registry() -> ImproverRegistry {
    let registry = ImproverRegistry::new();
    registry.register_fn("shout", |text: &str, _context: &ImprovementContext| {
        Ok(text.to_uppercase())
    });
    registry
}

fn context() -> ImprovementContext {
    Metadata::new().with("conversationId", "c1")
}

struct PanickingImprover;

#[async_trait]
impl MessageImprover for PanickingImprover {
    async fn improve(&self, _text: &str, _context: &ImprovementContext) -> ImproverResult<String> {
        panic!("improver exploded");
    }
}

struct CountingImprover {
    calls: AtomicUsize,
}

#[async_trait]
impl MessageImprover for CountingImprover {
    async fn improve(&self, text: &str, _context: &ImprovementContext) -> ImproverResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{text}!"))
    }
}

#[rstest]
fn new_registry_seeds_builtins_with_default_active() {
    let registry = ImproverRegistry::new();
    assert_eq!(registry.list(), vec!["creative", "default", "professional"]);
    assert_eq!(registry.active(), DEFAULT_IMPROVER);
}

#[rstest]
fn default_only_registry_holds_a_single_improver() {
    let registry = ImproverRegistry::with_default_only();
    assert_eq!(registry.list(), vec![DEFAULT_IMPROVER]);
    assert!(registry.exists(DEFAULT_IMPROVER));
    assert!(!registry.exists("professional"));
}

#[rstest]
fn set_active_selects_registered_improver(registry: ImproverRegistry) {
    assert!(registry.set_active("shout"));
    assert_eq!(registry.active(), "shout");
}

#[rstest]
fn set_active_rejects_unknown_name(registry: ImproverRegistry) {
    assert!(registry.set_active("professional"));
    assert!(!registry.set_active("missing"));
    assert_eq!(registry.active(), "professional");
}

#[rstest]
fn default_improver_cannot_be_removed(registry: ImproverRegistry) {
    assert!(!registry.remove(DEFAULT_IMPROVER));
    assert!(!registry.unregister(DEFAULT_IMPROVER));
    assert!(registry.list().contains(&DEFAULT_IMPROVER.to_owned()));
}

#[rstest]
fn removing_active_improver_reverts_to_default(registry: ImproverRegistry) {
    assert!(registry.set_active("shout"));
    assert!(registry.remove("shout"));
    assert_eq!(registry.active(), DEFAULT_IMPROVER);
    assert!(!registry.exists("shout"));
}

#[rstest]
fn removing_inactive_improver_keeps_selection(registry: ImproverRegistry) {
    assert!(registry.set_active("shout"));
    assert!(registry.remove("creative"));
    assert_eq!(registry.active(), "shout");
}

#[rstest]
fn removing_unknown_improver_reports_false(registry: ImproverRegistry) {
    assert!(!registry.unregister("missing"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_overwrites_existing_name(registry: ImproverRegistry) {
    registry.register_fn("shout", |text: &str, _context: &ImprovementContext| {
        Ok(format!("{text}?"))
    });

    let result = registry.improve_with("shout", "hello", &context()).await;
    assert_eq!(result.improved_message, "hello?");
    assert_eq!(registry.list().iter().filter(|n| *n == "shout").count(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn improve_uses_active_improver(registry: ImproverRegistry) {
    assert!(registry.set_active("shout"));

    let result = registry.improve("hello", &context()).await;

    assert_eq!(
        result,
        MessageImprovementResult::improved("hello", "HELLO", ImprovementType::Custom)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_improver_reports_default_type(registry: ImproverRegistry) {
    let result = registry.improve("hi there", &context()).await;

    assert_eq!(result.improved_message, "Hi there.");
    assert_eq!(result.improvement_type, ImprovementType::Default);
    assert!(result.is_improved());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_improver_passes_text_through(registry: ImproverRegistry) {
    let result = registry.improve_with("missing", "hello", &context()).await;

    assert_eq!(result.original_message, "hello");
    assert_eq!(result.improved_message, "hello");
    assert_eq!(result.improvement_type, ImprovementType::None);
    assert_eq!(result.error(), Some(IMPROVER_NOT_FOUND));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn improve_with_leaves_active_selection_alone(registry: ImproverRegistry) {
    let result = registry.improve_with("shout", "hello", &context()).await;

    assert_eq!(result.improvement_type, ImprovementType::Custom);
    assert_eq!(registry.active(), DEFAULT_IMPROVER);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_improver_is_isolated(registry: ImproverRegistry) {
    registry.register_fn("broken", |_text: &str, _context: &ImprovementContext| {
        Err(ImproverError::failed("cannot improve"))
    });

    let result = registry.improve_with("broken", "hello", &context()).await;

    assert_eq!(result.improvement_type, ImprovementType::None);
    assert_eq!(result.improved_message, result.original_message);
    assert_eq!(result.error(), Some("cannot improve"));
}

#[rstest]
#[case::blank_message(ImproverError::failed(""))]
#[case::whitespace_message(ImproverError::failed("   "))]
#[case::blank_source(ImproverError::source(std::io::Error::other("")))]
#[tokio::test(flavor = "multi_thread")]
async fn undescribed_failure_still_records_a_cause(
    registry: ImproverRegistry,
    #[case] failure: ImproverError,
) {
    registry.register_fn("silent", move |_text: &str, _context: &ImprovementContext| {
        Err(failure.clone())
    });

    let result = registry.improve_with("silent", "hello", &context()).await;

    assert_eq!(result.improvement_type, ImprovementType::None);
    assert_eq!(result.improved_message, "hello");
    assert_eq!(result.error(), Some("improver failed"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn panicking_improver_is_isolated(registry: ImproverRegistry) {
    registry.register("volatile", Arc::new(PanickingImprover));
    assert!(registry.set_active("volatile"));

    let result = registry.improve("hello", &context()).await;

    assert_eq!(result.improvement_type, ImprovementType::None);
    assert_eq!(result.improved_message, "hello");
    let cause = result.error().expect("panic cause should be recorded");
    assert!(cause.contains("improver exploded"));

    let after = registry.improve_with("shout", "still works", &context()).await;
    assert_eq!(after.improved_message, "STILL WORKS");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn improvers_receive_the_caller_context(registry: ImproverRegistry) {
    registry.register_fn("echo-conversation", |_text: &str, context: &ImprovementContext| {
        context
            .get_str("conversationId")
            .map(str::to_owned)
            .ok_or_else(|| ImproverError::failed("missing conversation"))
    });

    let result = registry
        .improve_with("echo-conversation", "ignored", &context())
        .await;

    assert_eq!(result.improved_message, "c1");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deterministic_improvers_are_idempotent(registry: ImproverRegistry) {
    let counter = Arc::new(CountingImprover {
        calls: AtomicUsize::new(0),
    });
    registry.register("counting", Arc::clone(&counter) as Arc<dyn MessageImprover>);

    let first = registry.improve_with("counting", "hello", &context()).await;
    let second = registry.improve_with("counting", "hello", &context()).await;

    assert_eq!(first, second);
    assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
}
