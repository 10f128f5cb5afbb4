//! Teamflow: team task tracking through a chat bot.
//!
//! Participants create and move tasks through slash commands, inline
//! buttons and keyword detection in ordinary chat messages. The crate holds
//! the conversational core and the persistence behind it; the chat
//! transport itself sits behind a port.
//!
//! # Architecture
//!
//! Teamflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`conversation`]: Event routing, dialogs, proposals and callbacks
//! - [`task`]: Task lifecycle and blockers
//! - [`directory`]: Chat participant tracking
//! - [`meeting`]: Meeting log
//! - [`config`]: TOML configuration
//! - [`telemetry`]: Structured logging set-up

pub mod config;
pub mod conversation;
pub mod directory;
pub mod meeting;
pub mod task;
pub mod telemetry;

#[cfg(test)]
mod test_support;
