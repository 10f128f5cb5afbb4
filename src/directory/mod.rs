//! Chat participant directory.
//!
//! Every participant observed by the bot is recorded here by external
//! (transport-assigned) identifier. Records are upserted on each event,
//! never duplicated, and only ever soft-deactivated.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - User tracking in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
