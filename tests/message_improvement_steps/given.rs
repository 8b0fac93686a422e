//! Given steps for message improvement BDD scenarios.

use super::world::ImprovementWorld;
use parley::improvement::{domain::ImprovementContext, error::ImproverError};
use rstest_bdd_macros::given;

#[given("an agent with the built-in improvers")]
fn agent_with_builtins(world: &mut ImprovementWorld) {
    *world = ImprovementWorld::new();
}

#[given(r#"an agent with an improver "{name}" that uppercases text"#)]
fn agent_with_uppercasing_improver(world: &mut ImprovementWorld, name: String) {
    *world = ImprovementWorld::new();
    world
        .service
        .improvers()
        .register_fn(name, |text: &str, _context: &ImprovementContext| {
            Ok(text.to_uppercase())
        });
}

#[given(r#"an agent with an improver "{name}" that always fails"#)]
fn agent_with_failing_improver(world: &mut ImprovementWorld, name: String) {
    *world = ImprovementWorld::new();
    world
        .service
        .improvers()
        .register_fn(name, |_text: &str, _context: &ImprovementContext| {
            Err(ImproverError::failed("improver is out of order"))
        });
}

#[given(r#"the improver "{name}" is active"#)]
fn improver_is_active(world: &mut ImprovementWorld, name: String) -> Result<(), eyre::Report> {
    if !world.service.improvers().set_active(&name) {
        return Err(eyre::eyre!("improver '{name}' should be registered"));
    }
    Ok(())
}
