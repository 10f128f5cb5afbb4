//! Settings that change how the bot behaves.

use crate::test_helpers::{InMemoryBot, TEAM_CHAT, thursday_morning};
use chrono::Duration;
use eyre::{bail, ensure};
use rstest::rstest;
use teamflow::config::{BotConfig, ConfigError};
use teamflow::conversation::domain::{CallbackAction, ProposalKey, TaskAction};
use teamflow::conversation::ports::SessionStore;
use teamflow::conversation::services::Effect;
use teamflow::task::domain::{TaskId, TaskStatus};

const TEAM_SETTINGS: &str = r#"
[bot]
web_url = "https://board.example.org"

[dialog]
ttl_minutes = 5

[proposals]
min_message_length = 6
ttl_minutes = 30
trigger_phrases = ["ship", "чиним"]
strip_phrases = ["ship", "чиним"]

[lifecycle]
transition_policy = "strict"
"#;

fn team_bot() -> eyre::Result<InMemoryBot> {
    let config = BotConfig::from_toml_str(TEAM_SETTINGS)?;
    Ok(InMemoryBot::start(config, thursday_morning()?)?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn custom_triggers_replace_the_defaults() -> eyre::Result<()> {
    let bot = team_bot()?;
    let anna = InMemoryBot::member(1, "Аня");

    let default_phrase = bot.say(&anna, "нужно обновить документацию").await;
    let (source, custom_phrase) = bot.post(&anna, "ship the release notes").await;

    ensure!(default_phrase.outcome.effect == Effect::Ignored);
    ensure!(
        custom_phrase.outcome.effect == Effect::ProposalStaged(ProposalKey::new(TEAM_CHAT, source))
    );
    let stored = bot
        .proposals
        .get(&ProposalKey::new(TEAM_CHAT, source))
        .await?;
    ensure!(stored.map(|proposal| proposal.title) == Some("the release notes".to_owned()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn proposal_lifetime_follows_the_settings() -> eyre::Result<()> {
    let bot = team_bot()?;
    let anna = InMemoryBot::member(1, "Аня");
    let (source, _) = bot.post(&anna, "чиним флаки в CI").await;
    let prompt = bot.last_sent_message()?;

    bot.clock.advance(Duration::minutes(31));
    let report = bot
        .press(&anna, prompt, &CallbackAction::ConfirmProposal(source))
        .await;

    ensure!(
        report.outcome.effect == Effect::ProposalExpired(ProposalKey::new(TEAM_CHAT, source))
    );
    ensure!(bot.tasks.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn abandoned_dialog_expires_with_its_ttl() -> eyre::Result<()> {
    let bot = team_bot()?;
    let anna = InMemoryBot::member(1, "Аня");
    bot.say(&anna, "/task").await;

    bot.clock.advance(Duration::minutes(6));
    let late_title = bot.say(&anna, "Разобрать почту").await;

    ensure!(late_title.outcome.effect == Effect::Ignored);
    ensure!(bot.tasks.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn strict_policy_refuses_to_restart_finished_tasks() -> eyre::Result<()> {
    let bot = team_bot()?;
    let anna = InMemoryBot::member(1, "Аня");
    bot.say(&anna, "/task").await;
    bot.say(&anna, "Провести ретро").await;
    let task_id = match bot.say(&anna, "/skip").await.outcome.effect {
        Effect::TaskCreated(task_id) => task_id,
        other => bail!("expected a created task, got {other:?}"),
    };
    let announcement = bot.last_sent_message()?;

    let press = |action: TaskAction, id: TaskId| CallbackAction::Task {
        task_id: id,
        action,
    };
    bot.press(&anna, announcement, &press(TaskAction::Done, task_id))
        .await;
    let restarted = bot
        .press(&anna, announcement, &press(TaskAction::Start, task_id))
        .await;

    ensure!(
        restarted.outcome.effect
            == Effect::TransitionRejected {
                task_id,
                from: TaskStatus::Done,
                to: TaskStatus::Doing
            }
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn help_points_at_the_configured_web_ui() -> eyre::Result<()> {
    let bot = team_bot()?;
    bot.say(&InMemoryBot::member(1, "Аня"), "/help").await;

    let call = bot.last_call()?;
    ensure!(call.text().is_some_and(|text| text.contains("https://board.example.org")));
    Ok(())
}

#[rstest]
#[case("[proposals]\ntrigger_phrases = []", "proposals")]
#[case("[listing]\npage_size = 0", "listing.page_size")]
#[case("[bot]\nweb_url = \"  \"", "bot.web_url")]
fn unusable_settings_are_rejected(#[case] document: &str, #[case] mentions: &str) {
    let err = BotConfig::from_toml_str(document).expect_err("settings must be rejected");

    match err {
        ConfigError::Invalid { field, .. } => assert_eq!(field, mentions),
        ConfigError::Triggers(_) => assert_eq!(mentions, "proposals"),
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn missing_settings_file_is_a_read_error() {
    let path = std::env::temp_dir().join("teamflow-settings-that-do-not-exist.toml");

    let err = BotConfig::load(&path).expect_err("missing file must fail");

    assert!(matches!(err, ConfigError::Read { .. }));
}
