//! A small team creating and finishing work through the bot.

use crate::test_helpers::{InMemoryBot, thursday_morning};
use eyre::{bail, ensure};
use rstest::{fixture, rstest};
use teamflow::config::BotConfig;
use teamflow::conversation::adapters::memory::TransportCall;
use teamflow::conversation::domain::{CallbackAction, ListFilter, TaskAction};
use teamflow::conversation::services::Effect;
use teamflow::task::domain::{TaskId, TaskOrigin, TaskStatus};
use teamflow::task::ports::{TaskFilter, TaskRepository};

#[fixture]
fn bot() -> InMemoryBot {
    let now = thursday_morning().expect("fixed timestamp");
    InMemoryBot::start(BotConfig::default(), now).expect("bot wires")
}

fn created(effect: &Effect) -> eyre::Result<TaskId> {
    match effect {
        Effect::TaskCreated(task_id) => Ok(*task_id),
        other => bail!("expected a created task, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dialog_task_is_claimed_and_finished(bot: InMemoryBot) -> eyre::Result<()> {
    let anna = InMemoryBot::member(1, "Аня");
    let boris = InMemoryBot::member(2, "Борис");
    bot.say(&boris, "/start").await;

    bot.say(&anna, "/task").await;
    bot.say(&anna, "Подготовить демо").await;
    let report = bot.say(&anna, "Слайды и стенд к пятнице").await;
    let task_id = created(&report.outcome.effect)?;
    let announcement = bot.last_sent_message()?;

    let claimed = bot
        .press(
            &boris,
            announcement,
            &CallbackAction::Task {
                task_id,
                action: TaskAction::Start,
            },
        )
        .await;
    ensure!(
        claimed.outcome.effect
            == Effect::TaskUpdated {
                task_id,
                status: TaskStatus::Doing
            }
    );
    let finished = bot
        .press(
            &boris,
            announcement,
            &CallbackAction::Task {
                task_id,
                action: TaskAction::Done,
            },
        )
        .await;
    ensure!(
        finished.outcome.effect
            == Effect::TaskUpdated {
                task_id,
                status: TaskStatus::Done
            }
    );

    let stored = bot
        .tasks
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| eyre::eyre!("task stored"))?;
    ensure!(stored.status() == TaskStatus::Done);
    ensure!(stored.description() == Some("Слайды и стенд к пятнице"));
    ensure!(*stored.origin() == TaskOrigin::ManualCommand);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mine_filter_lists_only_the_viewers_tasks(bot: InMemoryBot) -> eyre::Result<()> {
    let anna = InMemoryBot::member(1, "Аня");
    let boris = InMemoryBot::member(2, "Борис");
    for (who, title) in [(&anna, "Обновить зависимости"), (&boris, "Починить деплой")] {
        bot.say(who, "/task").await;
        bot.say(who, title).await;
        let task_id = created(&bot.say(who, "/skip").await.outcome.effect)?;
        let announcement = bot.last_sent_message()?;
        bot.press(
            who,
            announcement,
            &CallbackAction::Assign {
                task_id,
                user_id: who.id,
                claim: true,
            },
        )
        .await;
    }

    let listing = bot.say(&anna, "/tasks").await;
    ensure!(listing.outcome.effect == Effect::TaskListShown);
    let list_message = bot.last_sent_message()?;
    bot.press(&anna, list_message, &CallbackAction::TaskList(ListFilter::Mine))
        .await;

    let TransportCall::Edit { reply, message_id, .. } = bot.last_call()? else {
        bail!("expected the list to be edited in place");
    };
    ensure!(message_id == list_message);
    ensure!(reply.text.contains("Обновить зависимости"));
    ensure!(!reply.text.contains("Починить деплой"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopened_task_returns_to_the_backlog(bot: InMemoryBot) -> eyre::Result<()> {
    let anna = InMemoryBot::member(1, "Аня");
    bot.say(&anna, "/task").await;
    bot.say(&anna, "Закрыть квартал").await;
    let task_id = created(&bot.say(&anna, "/skip").await.outcome.effect)?;
    let announcement = bot.last_sent_message()?;

    for action in [TaskAction::Done, TaskAction::Reopen] {
        bot.press(&anna, announcement, &CallbackAction::Task { task_id, action })
            .await;
    }

    let backlog = bot
        .tasks
        .list(&TaskFilter::all().with_status(TaskStatus::Todo))
        .await?;
    ensure!(backlog.iter().map(|task| task.id()).collect::<Vec<_>>() == [task_id]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn forged_button_payload_changes_nothing(bot: InMemoryBot) -> eyre::Result<()> {
    let anna = InMemoryBot::member(1, "Аня");
    let report = bot
        .press_raw(&anna, teamflow::task::domain::MessageId::new(7), "task:nope:start")
        .await;

    ensure!(matches!(report.outcome.effect, Effect::InvalidCallback(_)));
    ensure!(bot.tasks.is_empty());
    ensure!(matches!(bot.last_call()?, TransportCall::Answer { .. }));
    Ok(())
}
