//! When steps for keyword proposal BDD scenarios.

use super::world::{ProposalWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use teamflow::conversation::domain::CallbackAction;
use teamflow::conversation::services::Effect;

#[when(r#""{name}" writes "{text}""#)]
fn member_writes(
    world: &mut ProposalWorld,
    name: String,
    text: String,
) -> Result<(), eyre::Report> {
    let member = world.member(&name)?;
    let (source, report) = run_async(world.bot.post(&member, &text));
    if matches!(report.outcome.effect, Effect::ProposalStaged(_)) {
        world.source = Some(source);
        world.prompt = Some(
            world
                .bot
                .last_sent_message()
                .wrap_err("proposal prompt was not delivered")?,
        );
    }
    world.last_report = Some(report);
    Ok(())
}

#[when(r#""{name}" confirms the proposal"#)]
fn member_confirms(world: &mut ProposalWorld, name: String) -> Result<(), eyre::Report> {
    let member = world.member(&name)?;
    let (source, prompt) = world.staged()?;
    let report = run_async(world.bot.press(
        &member,
        prompt,
        &CallbackAction::ConfirmProposal(source),
    ));
    if let Effect::TaskCreated(task_id) = report.outcome.effect {
        world.created = Some(task_id);
    }
    world.last_report = Some(report);
    Ok(())
}

#[when(r#""{name}" cancels the proposal"#)]
fn member_cancels(world: &mut ProposalWorld, name: String) -> Result<(), eyre::Report> {
    let member = world.member(&name)?;
    let (source, prompt) = world.staged()?;
    let report = run_async(world.bot.press(
        &member,
        prompt,
        &CallbackAction::CancelProposal(source),
    ));
    world.last_report = Some(report);
    Ok(())
}

#[when(r#""{name}" claims the new task"#)]
fn member_claims(world: &mut ProposalWorld, name: String) -> Result<(), eyre::Report> {
    let member = world.member(&name)?;
    let (_, prompt) = world.staged()?;
    let task_id = world
        .created
        .ok_or_else(|| eyre::eyre!("no task created in scenario world"))?;
    let report = run_async(world.bot.press(
        &member,
        prompt,
        &CallbackAction::Assign {
            task_id,
            user_id: member.id,
            claim: true,
        },
    ));
    world.last_report = Some(report);
    Ok(())
}
