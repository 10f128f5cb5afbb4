//! Conversational core of the bot.
//!
//! Inbound chat events are classified, routed through an ordered table to
//! exactly one handler group, and answered through a [`ports::ChatTransport`].
//! Dialog state and keyword proposals live in a [`ports::SessionStore`].
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Handlers and the dispatcher in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
