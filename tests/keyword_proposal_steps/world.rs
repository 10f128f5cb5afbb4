//! Shared world state for keyword proposal BDD scenarios.

use std::collections::HashMap;

use crate::test_helpers::{InMemoryBot, thursday_morning};
use rstest::fixture;
use teamflow::config::BotConfig;
use teamflow::conversation::domain::Sender;
use teamflow::conversation::services::DispatchReport;
use teamflow::task::domain::{MessageId, TaskId};

/// Scenario world for keyword proposal behaviour tests.
pub struct ProposalWorld {
    pub bot: InMemoryBot,
    pub members: HashMap<String, Sender>,
    pub source: Option<MessageId>,
    pub prompt: Option<MessageId>,
    pub created: Option<TaskId>,
    pub last_report: Option<DispatchReport>,
}

impl ProposalWorld {
    /// Creates a world around a freshly wired bot.
    #[must_use]
    pub fn new() -> Self {
        let now = thursday_morning().expect("fixed timestamp");
        Self {
            bot: InMemoryBot::start(BotConfig::default(), now).expect("bot wires"),
            members: HashMap::new(),
            source: None,
            prompt: None,
            created: None,
            last_report: None,
        }
    }

    /// Returns the participant introduced as `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when nobody with that name was introduced.
    pub fn member(&self, name: &str) -> Result<Sender, eyre::Report> {
        self.members
            .get(name)
            .cloned()
            .ok_or_else(|| eyre::eyre!("{name} was not introduced in this scenario"))
    }

    /// Returns the staged proposal's source and prompt messages.
    ///
    /// # Errors
    ///
    /// Returns an error when no proposal was staged.
    pub fn staged(&self) -> Result<(MessageId, MessageId), eyre::Report> {
        self.source
            .zip(self.prompt)
            .ok_or_else(|| eyre::eyre!("no proposal staged in scenario world"))
    }
}

impl Default for ProposalWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ProposalWorld {
    ProposalWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
