//! Behaviour tests for the message improvement pipeline.

mod message_improvement_steps;

use message_improvement_steps::world::{ImprovementWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/message_improvement.feature",
    name = "Active custom improver transforms inbound text"
)]
#[tokio::test(flavor = "multi_thread")]
async fn active_custom_improver(world: ImprovementWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/message_improvement.feature",
    name = "Improvement can be skipped per message"
)]
#[tokio::test(flavor = "multi_thread")]
async fn improvement_skipped(world: ImprovementWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/message_improvement.feature",
    name = "A failing improver leaves the text unchanged"
)]
#[tokio::test(flavor = "multi_thread")]
async fn failing_improver_fails_open(world: ImprovementWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/message_improvement.feature",
    name = "Removing the active improver falls back to default"
)]
#[tokio::test(flavor = "multi_thread")]
async fn removing_active_falls_back(world: ImprovementWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/message_improvement.feature",
    name = "The default improver cannot be removed"
)]
#[tokio::test(flavor = "multi_thread")]
async fn default_is_protected(world: ImprovementWorld) {
    let _ = world;
}
