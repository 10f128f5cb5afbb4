//! Reports computed from the shared task store and meeting log.

use crate::test_helpers::{InMemoryBot, thursday_morning};
use chrono::Duration;
use eyre::ensure;
use rstest::{fixture, rstest};
use teamflow::config::BotConfig;
use teamflow::conversation::services::Effect;
use teamflow::task::domain::{TaskOrigin, TaskStatus};
use teamflow::task::services::CreateTaskRequest;

#[fixture]
fn bot() -> InMemoryBot {
    let now = thursday_morning().expect("fixed timestamp");
    InMemoryBot::start(BotConfig::default(), now).expect("bot wires")
}

fn last_text(bot: &InMemoryBot) -> eyre::Result<String> {
    let call = bot.last_call()?;
    call.text()
        .map(str::to_owned)
        .ok_or_else(|| eyre::eyre!("last call carried no text"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_lists_unfinished_tasks_past_their_due_date(
    bot: InMemoryBot,
) -> eyre::Result<()> {
    let tasks = bot.dispatcher.context().tasks();
    let yesterday = thursday_morning()? - Duration::days(1);
    tasks
        .create(
            CreateTaskRequest::new("Сдать отчёт", TaskOrigin::ManualCommand)
                .with_due_date(yesterday),
        )
        .await?;
    let finished = tasks
        .create(
            CreateTaskRequest::new("Оплатить хостинг", TaskOrigin::ManualCommand)
                .with_due_date(yesterday),
        )
        .await?;
    tasks.change_status(finished.id(), TaskStatus::Done).await?;
    tasks
        .create(
            CreateTaskRequest::new("Обновить сертификат", TaskOrigin::ManualCommand)
                .with_due_date(yesterday + Duration::days(7)),
        )
        .await?;

    let report = bot.say(&InMemoryBot::member(1, "Аня"), "/overdue").await;

    ensure!(report.outcome.effect == Effect::ReportShown);
    let text = last_text(&bot)?;
    ensure!(text.contains("Сдать отчёт (до 11.03.2026)"));
    ensure!(!text.contains("Оплатить хостинг"));
    ensure!(!text.contains("Обновить сертификат"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn weekly_board_rolls_over_on_monday(bot: InMemoryBot) -> eyre::Result<()> {
    let anna = InMemoryBot::member(1, "Аня");
    bot.say(&anna, "/task").await;
    bot.say(&anna, "Подготовить планёрку").await;
    bot.say(&anna, "/skip").await;

    bot.say(&anna, "/week").await;
    let this_week = last_text(&bot)?;
    bot.clock.advance(Duration::days(4));
    bot.say(&anna, "/week").await;
    let next_week = last_text(&bot)?;

    ensure!(this_week.starts_with("📅 Недельная доска (с 09.03)"));
    ensure!(this_week.contains("Подготовить планёрку"));
    ensure!(next_week.starts_with("📅 Недельная доска (с 16.03)"));
    ensure!(!next_week.contains("Подготовить планёрку"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn digest_counts_overdue_tasks_from_earlier_weeks(bot: InMemoryBot) -> eyre::Result<()> {
    let tasks = bot.dispatcher.context().tasks();
    tasks
        .create(
            CreateTaskRequest::new("Мигрировать базу", TaskOrigin::ManualCommand)
                .with_due_date(thursday_morning()? + Duration::days(1)),
        )
        .await?;
    bot.clock.advance(Duration::days(7));

    bot.say(&InMemoryBot::member(1, "Аня"), "/digest").await;

    let text = last_text(&bot)?;
    ensure!(text.contains("📝 Создано: 0"));
    ensure!(text.contains("⏰ Просрочено: 1"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn meeting_history_shows_the_latest_first(bot: InMemoryBot) -> eyre::Result<()> {
    let anna = InMemoryBot::member(1, "Аня");
    let first = bot.say(&anna, "/meeting Планирование спринта").await;
    bot.clock.advance(Duration::hours(2));
    bot.say(&anna, "/meeting Ретро по релизу").await;

    bot.say(&anna, "/meetings").await;

    ensure!(matches!(first.outcome.effect, Effect::MeetingRecorded(_)));
    let text = last_text(&bot)?;
    let retro = text.find("11:30 — Ретро по релизу");
    let planning = text.find("09:30 — Планирование спринта");
    ensure!(retro.is_some() && planning.is_some());
    ensure!(retro < planning);
    Ok(())
}
