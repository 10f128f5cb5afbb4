//! Inbound chat events as delivered by the transport.

use crate::directory::domain::{ExternalUserId, UserProfile};
use crate::task::domain::{ChatId, MessageId};
use serde::{Deserialize, Serialize};

/// Author of an inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Transport identity.
    pub id: ExternalUserId,
    /// First name.
    pub first_name: String,
    /// Optional handle without `@`.
    pub username: Option<String>,
    /// Optional last name.
    pub last_name: Option<String>,
    /// Whether the author is a bot account.
    pub is_bot: bool,
}

impl Sender {
    /// Creates a human sender with the required fields.
    #[must_use]
    pub fn new(id: ExternalUserId, first_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            username: None,
            last_name: None,
            is_bot: false,
        }
    }

    /// Sets the handle.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Marks the sender as a bot account.
    #[must_use]
    pub const fn as_bot(mut self) -> Self {
        self.is_bot = true;
        self
    }

    /// Returns the directory profile for this sender.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        let mut profile = UserProfile::new(self.id, self.first_name.clone());
        if let Some(username) = &self.username {
            profile = profile.with_username(username.clone());
        }
        if let Some(last_name) = &self.last_name {
            profile = profile.with_last_name(last_name.clone());
        }
        profile
    }
}

/// A `/name args` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEvent {
    /// Chat the command was posted in.
    pub chat_id: ChatId,
    /// The command message.
    pub message_id: MessageId,
    /// Author.
    pub sender: Sender,
    /// Lower-cased command name without slash or bot suffix.
    pub name: String,
    /// Trimmed text after the command name.
    pub args: String,
}

/// A plain text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEvent {
    /// Chat the message was posted in.
    pub chat_id: ChatId,
    /// The message.
    pub message_id: MessageId,
    /// Author.
    pub sender: Sender,
    /// Message text as sent.
    pub text: String,
}

/// A press on an inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackEvent {
    /// Chat holding the originating message.
    pub chat_id: ChatId,
    /// Message carrying the pressed keyboard.
    pub message_id: MessageId,
    /// Who pressed the button.
    pub sender: Sender,
    /// Transport handle used to acknowledge the press.
    pub query_id: String,
    /// Raw callback payload.
    pub data: String,
}

/// One event received from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Slash command.
    Command(CommandEvent),
    /// Free text.
    TextMessage(TextEvent),
    /// Button press.
    CallbackQuery(CallbackEvent),
}

impl InboundEvent {
    /// Classifies a raw message as a command or free text.
    ///
    /// Text whose first token is `/name` or `/name@bot` is a command; the
    /// rest of the text becomes its arguments.
    #[must_use]
    pub fn from_message(
        chat_id: ChatId,
        message_id: MessageId,
        sender: Sender,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        match parse_command(&text) {
            Some((name, args)) => Self::Command(CommandEvent {
                chat_id,
                message_id,
                sender,
                name,
                args,
            }),
            None => Self::TextMessage(TextEvent {
                chat_id,
                message_id,
                sender,
                text,
            }),
        }
    }

    /// Returns the chat the event belongs to.
    #[must_use]
    pub const fn chat_id(&self) -> ChatId {
        match self {
            Self::Command(event) => event.chat_id,
            Self::TextMessage(event) => event.chat_id,
            Self::CallbackQuery(event) => event.chat_id,
        }
    }

    /// Returns the event author.
    #[must_use]
    pub const fn sender(&self) -> &Sender {
        match self {
            Self::Command(event) => &event.sender,
            Self::TextMessage(event) => &event.sender,
            Self::CallbackQuery(event) => &event.sender,
        }
    }

    /// Returns the command name when the event is a command.
    #[must_use]
    pub fn command_name(&self) -> Option<&str> {
        match self {
            Self::Command(event) => Some(event.name.as_str()),
            Self::TextMessage(_) | Self::CallbackQuery(_) => None,
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::TextMessage(_) => "text",
            Self::CallbackQuery(_) => "callback",
        }
    }
}

fn parse_command(text: &str) -> Option<(String, String)> {
    let rest = text.trim_start().strip_prefix('/')?;
    let (token, args) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    let name = token.split_once('@').map_or(token, |(name, _)| name);
    if name.is_empty()
        || !name
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || character == '_')
    {
        return None;
    }
    Some((name.to_ascii_lowercase(), args.trim().to_owned()))
}
