//! Then steps for message improvement BDD scenarios.

use super::world::{ImprovementWorld, run_async};
use eyre::WrapErr;
use parley::conversation::domain::ConversationId;
use rstest_bdd_macros::then;

#[then(r#"the improved text is "{expected}""#)]
fn improved_text_is(world: &mut ImprovementWorld, expected: String) -> Result<(), eyre::Report> {
    let result = world.result()?;
    if result.improved_message != expected {
        return Err(eyre::eyre!(
            "expected improved text '{expected}', got '{}'",
            result.improved_message
        ));
    }
    Ok(())
}

#[then(r#"the improvement type is "{expected}""#)]
fn improvement_type_is(world: &mut ImprovementWorld, expected: String) -> Result<(), eyre::Report> {
    let result = world.result()?;
    if result.improvement_type.as_str() != expected {
        return Err(eyre::eyre!(
            "expected improvement type '{expected}', got '{}'",
            result.improvement_type
        ));
    }
    Ok(())
}

#[then("the improvement records an error")]
fn improvement_records_error(world: &mut ImprovementWorld) -> Result<(), eyre::Report> {
    let result = world.result()?;
    match result.error() {
        Some(cause) if !cause.is_empty() => Ok(()),
        _ => Err(eyre::eyre!("expected an error cause in {result:?}")),
    }
}

#[then("the agent has processed {count:usize} messages")]
fn agent_processed(world: &mut ImprovementWorld, count: usize) -> Result<(), eyre::Report> {
    let expected = u64::try_from(count).wrap_err("count fits in u64")?;
    let actual = world.service.message_count();
    if actual != expected {
        return Err(eyre::eyre!("expected {expected} processed messages, found {actual}"));
    }
    Ok(())
}

#[then(r#"conversation "{conversation}" holds exactly message "{id}""#)]
fn conversation_holds_exactly(
    world: &mut ImprovementWorld,
    conversation: String,
    id: String,
) -> Result<(), eyre::Report> {
    let stored = run_async(world.service.conversation(&ConversationId::new(conversation)))
        .wrap_err("conversation lookup should succeed")?
        .ok_or_else(|| eyre::eyre!("conversation should exist"))?;
    let ids: Vec<&str> = stored
        .messages()
        .iter()
        .map(|message| message.id().as_str())
        .collect();
    if ids != [id.as_str()] {
        return Err(eyre::eyre!("expected only message '{id}', found {ids:?}"));
    }
    Ok(())
}

#[then(r#"the active improver is "{expected}""#)]
fn active_improver_is(world: &mut ImprovementWorld, expected: String) -> Result<(), eyre::Report> {
    let active = world.service.improvers().active();
    if active != expected {
        return Err(eyre::eyre!("expected active improver '{expected}', got '{active}'"));
    }
    Ok(())
}

#[then("the removal is refused")]
fn removal_refused(world: &mut ImprovementWorld) -> Result<(), eyre::Report> {
    match world.last_removal {
        Some(false) => Ok(()),
        other => Err(eyre::eyre!("expected a refused removal, got {other:?}")),
    }
}
