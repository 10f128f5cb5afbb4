//! Then steps for keyword proposal BDD scenarios.

use super::world::{ProposalWorld, run_async};
use rstest_bdd_macros::then;
use teamflow::conversation::adapters::memory::TransportCall;
use teamflow::conversation::domain::CallbackAction;
use teamflow::conversation::services::Effect;
use teamflow::task::domain::{Task, TaskStatus};
use teamflow::task::ports::{TaskFilter, TaskRepository};

fn stored_tasks(world: &ProposalWorld) -> Result<Vec<Task>, eyre::Report> {
    Ok(run_async(world.bot.tasks.list(&TaskFilter::all()))?)
}

fn task_titled(world: &ProposalWorld, title: &str) -> Result<Task, eyre::Report> {
    stored_tasks(world)?
        .into_iter()
        .find(|task| task.title() == title)
        .ok_or_else(|| eyre::eyre!("no task titled {title:?}"))
}

fn last_effect(world: &ProposalWorld) -> Result<&Effect, eyre::Report> {
    world
        .last_report
        .as_ref()
        .map(|report| &report.outcome.effect)
        .ok_or_else(|| eyre::eyre!("nothing dispatched in scenario world"))
}

#[then(r#"the bot proposes a task titled "{title}""#)]
fn bot_proposes(world: &ProposalWorld, title: String) -> Result<(), eyre::Report> {
    let (source, _) = world.staged()?;
    let TransportCall::Send { reply, .. } = world.bot.last_call()? else {
        return Err(eyre::eyre!("expected the proposal to be sent"));
    };
    eyre::ensure!(reply.reply_to == Some(source), "prompt must reply to the source");
    eyre::ensure!(
        reply.text.ends_with(&title),
        "prompt {:?} does not name {title:?}",
        reply.text
    );
    Ok(())
}

#[then(r#"a task titled "{title}" exists with status "{status}""#)]
fn task_exists(world: &ProposalWorld, title: String, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = task_titled(world, &title)?;
    eyre::ensure!(
        task.status() == expected,
        "expected status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the confirmation offers to assign "{name}""#)]
fn confirmation_offers(world: &ProposalWorld, name: String) -> Result<(), eyre::Report> {
    let member = world.member(&name)?;
    let call = world.bot.last_call()?;
    let offered = world
        .bot
        .transport
        .calls()
        .iter()
        .filter_map(TransportCall::reply)
        .filter_map(|reply| reply.keyboard.as_ref())
        .flat_map(|keyboard| keyboard.buttons())
        .any(|button| {
            matches!(
                button.action,
                CallbackAction::Assign { user_id, claim: false, .. } if user_id == member.id
            )
        });
    eyre::ensure!(offered, "no shortcut for {name}; last call was {call:?}");
    Ok(())
}

#[then("only one task exists")]
fn only_one_task(world: &ProposalWorld) -> Result<(), eyre::Report> {
    let count = stored_tasks(world)?.len();
    eyre::ensure!(count == 1, "expected one task, found {count}");
    Ok(())
}

#[then("no task exists")]
fn no_task(world: &ProposalWorld) -> Result<(), eyre::Report> {
    let count = stored_tasks(world)?.len();
    eyre::ensure!(count == 0, "expected no tasks, found {count}");
    Ok(())
}

#[then("the last press reports that the proposal expired")]
fn proposal_expired(world: &ProposalWorld) -> Result<(), eyre::Report> {
    let effect = last_effect(world)?;
    eyre::ensure!(
        matches!(effect, Effect::ProposalExpired(_)),
        "expected an expired proposal, got {effect:?}"
    );
    Ok(())
}

#[then("the proposal prompt is removed")]
fn proposal_removed(world: &ProposalWorld) -> Result<(), eyre::Report> {
    let (_, prompt) = world.staged()?;
    let removed = world.bot.transport.calls().iter().any(|call| {
        matches!(
            call,
            TransportCall::Delete { message_id, .. } if *message_id == prompt
        )
    });
    eyre::ensure!(removed, "prompt {prompt} was not deleted");
    Ok(())
}

#[then("no proposal is made")]
fn no_proposal(world: &ProposalWorld) -> Result<(), eyre::Report> {
    let effect = last_effect(world)?;
    eyre::ensure!(*effect == Effect::Ignored, "expected no proposal, got {effect:?}");
    eyre::ensure!(world.bot.proposals.is_empty(), "a proposal was stored");
    Ok(())
}

#[then(r#"the task is assigned to "{name}""#)]
fn task_assigned(world: &ProposalWorld, name: String) -> Result<(), eyre::Report> {
    let task_id = world
        .created
        .ok_or_else(|| eyre::eyre!("no task created in scenario world"))?;
    let task = run_async(world.bot.tasks.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("created task is gone"))?;
    let assignee = task
        .assignee()
        .map(|assignee| assignee.display_name.as_str());
    eyre::ensure!(
        assignee == Some(name.as_str()),
        "expected assignee {name}, found {assignee:?}"
    );
    Ok(())
}
