//! Keyword-triggered task proposals.

use crate::task::domain::{ChatId, MessageId, TaskTitle};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identity of a staged proposal: the message that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalKey {
    /// Chat of the triggering message.
    pub chat_id: ChatId,
    /// The triggering message.
    pub message_id: MessageId,
}

impl ProposalKey {
    /// Creates a proposal key.
    #[must_use]
    pub const fn new(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}

impl fmt::Display for ProposalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.message_id)
    }
}

/// Candidate task awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingProposal {
    /// Candidate title.
    pub title: String,
}

/// Errors raised while building a [`TriggerMatcher`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TriggerMatcherError {
    /// No usable trigger phrase was supplied.
    #[error("at least one trigger phrase is required")]
    NoTriggers,
    /// The minimum message length is zero.
    #[error("minimum message length must be positive")]
    ZeroMinimumLength,
    /// The title limit is zero or wider than a task title.
    #[error("title limit must be between 1 and {max}, got {actual}")]
    TitleLimit {
        /// Rejected limit.
        actual: usize,
        /// Widest permitted limit.
        max: usize,
    },
    /// A phrase set failed to compile.
    #[error("trigger pattern failed to compile: {0}")]
    Pattern(String),
}

/// Detects task intent in free text and derives a candidate title.
#[derive(Debug, Clone)]
pub struct TriggerMatcher {
    detect: Regex,
    strip: Option<Regex>,
    min_length: usize,
    max_title_length: usize,
}

impl TriggerMatcher {
    /// Builds a matcher from trigger and strip phrase sets.
    ///
    /// Phrases match case-insensitively on whole words; longer phrases are
    /// tried first so `need to` wins over `need`.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerMatcherError`] for empty trigger sets, zero limits
    /// or phrases that do not compile.
    pub fn new(
        triggers: &[String],
        strip_phrases: &[String],
        min_length: usize,
        max_title_length: usize,
    ) -> Result<Self, TriggerMatcherError> {
        if min_length == 0 {
            return Err(TriggerMatcherError::ZeroMinimumLength);
        }
        if max_title_length == 0 || max_title_length > TaskTitle::MAX_LENGTH {
            return Err(TriggerMatcherError::TitleLimit {
                actual: max_title_length,
                max: TaskTitle::MAX_LENGTH,
            });
        }
        let trigger_set = alternation(triggers).ok_or(TriggerMatcherError::NoTriggers)?;
        let detect = compile(&format!(r"(?i)\b(?:{trigger_set})\b"))?;
        let strip = alternation(strip_phrases)
            .map(|strip_set| compile(&format!(r"(?i)^(?:{strip_set})\b[\s\p{{P}}]*")))
            .transpose()?;
        Ok(Self {
            detect,
            strip,
            min_length,
            max_title_length,
        })
    }

    /// Returns the candidate title when `text` looks like a task.
    ///
    /// Commands, messages shorter than the minimum length, and messages
    /// without a trigger phrase yield `None`.
    #[must_use]
    pub fn candidate(&self, text: &str) -> Option<String> {
        if text.trim_start().starts_with('/') {
            return None;
        }
        if text.chars().count() < self.min_length {
            return None;
        }
        if !self.detect.is_match(text) {
            return None;
        }
        Some(self.extract_title(text))
    }

    /// Strips one leading trigger phrase and truncates the remainder.
    ///
    /// Falls back to the truncated message when nothing is left.
    #[must_use]
    pub fn extract_title(&self, text: &str) -> String {
        let trimmed = text.trim();
        let stripped = self
            .strip
            .as_ref()
            .map_or(trimmed, |strip| {
                strip
                    .find(trimmed)
                    .and_then(|found| trimmed.get(found.end()..))
                    .unwrap_or(trimmed)
            })
            .trim();
        let source = if stripped.is_empty() { trimmed } else { stripped };
        truncate_chars(source, self.max_title_length)
            .trim_end()
            .to_owned()
    }
}

fn alternation(phrases: &[String]) -> Option<String> {
    let mut cleaned: Vec<&str> = phrases
        .iter()
        .map(|phrase| phrase.trim())
        .filter(|phrase| !phrase.is_empty())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.sort_by(|left, right| {
        right
            .chars()
            .count()
            .cmp(&left.chars().count())
            .then_with(|| left.cmp(right))
    });
    cleaned.dedup();
    Some(
        cleaned
            .into_iter()
            .map(|phrase| {
                phrase
                    .split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect::<Vec<_>>()
            .join("|"),
    )
}

fn compile(pattern: &str) -> Result<Regex, TriggerMatcherError> {
    Regex::new(pattern).map_err(|err| TriggerMatcherError::Pattern(err.to_string()))
}

fn truncate_chars(text: &str, max: usize) -> &str {
    text.char_indices()
        .nth(max)
        .and_then(|(index, _)| text.get(..index))
        .unwrap_or(text)
}
