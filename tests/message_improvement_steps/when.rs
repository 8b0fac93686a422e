//! When steps for message improvement BDD scenarios.

use super::world::{ImprovementWorld, run_async};
use eyre::WrapErr;
use mockable::DefaultClock;
use parley::{
    agent::domain::ProcessOptions,
    conversation::domain::{ConversationId, Message, MessageId, Role},
};
use rstest_bdd_macros::when;

fn user_message(id: String, text: String, conversation: String) -> Message {
    Message::builder(ConversationId::new(conversation), Role::User)
        .with_id(MessageId::new(id))
        .with_text(text)
        .build(&DefaultClock)
}

fn process(
    world: &mut ImprovementWorld,
    message: Message,
    options: &ProcessOptions,
) -> Result<(), eyre::Report> {
    let result = run_async(world.service.process_message(message, options))
        .wrap_err("processing should succeed")?;
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"message "{id}" with text "{text}" arrives in conversation "{conversation}""#)]
fn message_arrives(
    world: &mut ImprovementWorld,
    id: String,
    text: String,
    conversation: String,
) -> Result<(), eyre::Report> {
    process(
        world,
        user_message(id, text, conversation),
        &ProcessOptions::new(),
    )
}

#[when(
    r#"message "{id}" with text "{text}" arrives in conversation "{conversation}" with improvement disabled"#
)]
fn message_arrives_unimproved(
    world: &mut ImprovementWorld,
    id: String,
    text: String,
    conversation: String,
) -> Result<(), eyre::Report> {
    process(
        world,
        user_message(id, text, conversation),
        &ProcessOptions::new().skip_improvement(),
    )
}

#[when(r#"the improver "{name}" is removed"#)]
fn improver_removed(world: &mut ImprovementWorld, name: String) {
    world.last_removal = Some(world.service.improvers().remove(&name));
}
