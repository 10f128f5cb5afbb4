//! Who the bot knows about, as seen through its replies.

use crate::test_helpers::{InMemoryBot, thursday_morning};
use eyre::{bail, ensure};
use rstest::{fixture, rstest};
use teamflow::config::BotConfig;
use teamflow::conversation::domain::CallbackAction;
use teamflow::conversation::services::Effect;
use teamflow::directory::domain::ExternalUserId;
use teamflow::directory::ports::UserDirectory;
use teamflow::directory::services::TrackingOutcome;
use teamflow::task::domain::TaskId;

#[fixture]
fn bot() -> InMemoryBot {
    let now = thursday_morning().expect("fixed timestamp");
    InMemoryBot::start(BotConfig::default(), now).expect("bot wires")
}

async fn new_task(bot: &InMemoryBot, title: &str) -> eyre::Result<TaskId> {
    let author = InMemoryBot::member(1, "Аня");
    bot.say(&author, "/task").await;
    bot.say(&author, title).await;
    match bot.say(&author, "/skip").await.outcome.effect {
        Effect::TaskCreated(task_id) => Ok(task_id),
        other => bail!("expected a created task, got {other:?}"),
    }
}

async fn assignee_labels(bot: &InMemoryBot, task_id: TaskId) -> eyre::Result<Vec<String>> {
    let announcement = bot.last_sent_message()?;
    let report = bot
        .press(
            &InMemoryBot::member(1, "Аня"),
            announcement,
            &CallbackAction::AssignMenu(task_id),
        )
        .await;
    ensure!(report.outcome.effect == Effect::AssigneeMenuShown(task_id));
    let call = bot.last_call()?;
    let keyboard = call
        .reply()
        .and_then(|reply| reply.keyboard.clone())
        .ok_or_else(|| eyre::eyre!("assignee menu has no keyboard"))?;
    Ok(keyboard.buttons().map(|button| button.label.clone()).collect())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn other_bots_are_never_recorded(bot: InMemoryBot) -> eyre::Result<()> {
    let helper = InMemoryBot::member(900, "CI Bot").as_bot();

    let report = bot.say(&helper, "/start").await;

    ensure!(matches!(report.tracking, TrackingOutcome::SkippedBot));
    ensure!(bot.users.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_menu_uses_the_latest_names(bot: InMemoryBot) -> eyre::Result<()> {
    bot.say(&InMemoryBot::member(2, "Борис"), "/start").await;
    let renamed = InMemoryBot::member(2, "Борис")
        .with_last_name("Петров")
        .with_username("boris_dev");
    bot.say(&renamed, "всем привет").await;
    let task_id = new_task(&bot, "Написать релизные заметки").await?;

    let labels = assignee_labels(&bot, task_id).await?;

    ensure!(labels.contains(&"👤 @boris_dev".to_owned()));
    ensure!(bot.users.len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivated_participants_stay_out_of_the_picker(bot: InMemoryBot) -> eyre::Result<()> {
    let boris = InMemoryBot::member(2, "Борис");
    bot.say(&boris, "/start").await;
    bot.users
        .deactivate(ExternalUserId::new(2), thursday_morning()?)
        .await?;
    bot.say(&boris, "я вернулся").await;
    let task_id = new_task(&bot, "Проверить бэкапы").await?;

    let labels = assignee_labels(&bot, task_id).await?;

    ensure!(labels.iter().all(|label| !label.contains("Борис")));
    let stored = bot
        .users
        .find_by_external_id(ExternalUserId::new(2))
        .await?
        .ok_or_else(|| eyre::eyre!("participant kept"))?;
    ensure!(!stored.is_active());
    Ok(())
}
