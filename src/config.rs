//! Bot configuration loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration.
//! [`BotConfig::validate`] runs after every load.

use crate::conversation::domain::{TriggerMatcher, TriggerMatcherError};
use crate::task::domain::TransitionPolicy;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: Arc<std::io::Error>,
    },
    /// The text is not valid TOML for this schema.
    #[error("invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("{field}: {reason}")]
    Invalid {
        /// Offending field path.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// The keyword phrase sets do not form a usable matcher.
    #[error("proposals: {0}")]
    Triggers(#[from] TriggerMatcherError),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    /// General bot settings.
    pub bot: BotSection,
    /// Creation dialog settings.
    pub dialog: DialogConfig,
    /// Keyword proposal settings.
    pub proposals: ProposalConfig,
    /// Listing sizes.
    pub listing: ListingConfig,
    /// Task lifecycle rules.
    pub lifecycle: LifecycleConfig,
}

/// General bot settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotSection {
    /// Web UI address shown in the help text.
    pub web_url: String,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            web_url: "http://localhost:5180".to_owned(),
        }
    }
}

/// Creation dialog settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialogConfig {
    /// Minutes an abandoned dialog is kept.
    pub ttl_minutes: u32,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self { ttl_minutes: 60 }
    }
}

impl DialogConfig {
    /// Returns the session lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.ttl_minutes))
    }
}

/// Keyword proposal settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProposalConfig {
    /// Shorter messages are never proposed, in characters.
    pub min_message_length: usize,
    /// Candidate titles are cut to this many characters.
    pub max_title_length: usize,
    /// Other members offered after the claim shortcut.
    pub assign_shortcuts: usize,
    /// Minutes a proposal stays confirmable.
    pub ttl_minutes: u32,
    /// Phrases that mark a message as a task.
    pub trigger_phrases: Vec<String>,
    /// Leading phrases removed from candidate titles.
    pub strip_phrases: Vec<String>,
}

const TRIGGER_PHRASES: &[&str] = &[
    "нужно",
    "надо",
    "необходимо",
    "сделать",
    "задача",
    "задачу",
    "todo",
    "need to",
    "needs to",
    "please do",
    "fix",
    "исправить",
    "добавить",
    "реализовать",
    "проверить",
    "разобраться",
    "не забыть",
    "напомни",
    "remind",
];

fn owned(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|phrase| (*phrase).to_owned()).collect()
}

impl Default for ProposalConfig {
    fn default() -> Self {
        let strip = TRIGGER_PHRASES
            .iter()
            .map(|phrase| if *phrase == "please do" { "please" } else { *phrase });
        Self {
            min_message_length: 10,
            max_title_length: 200,
            assign_shortcuts: 6,
            ttl_minutes: 24 * 60,
            trigger_phrases: owned(TRIGGER_PHRASES),
            strip_phrases: strip.map(str::to_owned).collect(),
        }
    }
}

impl ProposalConfig {
    /// Returns the proposal lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.ttl_minutes))
    }

    /// Compiles the phrase sets into a matcher.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerMatcherError`] when the phrase sets or limits are
    /// unusable.
    pub fn matcher(&self) -> Result<TriggerMatcher, TriggerMatcherError> {
        TriggerMatcher::new(
            &self.trigger_phrases,
            &self.strip_phrases,
            self.min_message_length,
            self.max_title_length,
        )
    }
}

/// Listing sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Tasks shown per list message.
    pub page_size: usize,
    /// Members offered in the assign menu.
    pub assign_menu_size: usize,
    /// Meetings shown by `/meetings`.
    pub recent_meetings: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 15,
            assign_menu_size: 8,
            recent_meetings: 10,
        }
    }
}

/// Task lifecycle rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifecycleConfig {
    /// Status transition rules.
    pub transition_policy: TransitionPolicy,
}

impl BotConfig {
    /// Reads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed or
    /// validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source_path = path.as_ref();
        let content = std::fs::read_to_string(source_path).map_err(|err| ConfigError::Read {
            path: source_path.to_path_buf(),
            source: Arc::new(err),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text cannot be parsed or validated.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges and compiles the keyword matcher once.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero sizes and
    /// [`ConfigError::Triggers`] for unusable phrase sets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("dialog.ttl_minutes", u64::from(self.dialog.ttl_minutes))?;
        positive("proposals.ttl_minutes", u64::from(self.proposals.ttl_minutes))?;
        positive("listing.page_size", self.listing.page_size as u64)?;
        positive("listing.assign_menu_size", self.listing.assign_menu_size as u64)?;
        positive("listing.recent_meetings", self.listing.recent_meetings as u64)?;
        if self.bot.web_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "bot.web_url",
                reason: "must not be empty".to_owned(),
            });
        }
        self.proposals.matcher()?;
        Ok(())
    }
}

fn positive(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be greater than zero".to_owned(),
        });
    }
    Ok(())
}
