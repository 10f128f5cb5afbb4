//! Team task lifecycle.
//!
//! Tasks are created from the creation dialog or from confirmed keyword
//! proposals, then moved through `TODO`, `DOING`, `BLOCKED` and `DONE`.
//! Each mutating operation is one unit of work: the aggregate is changed
//! in memory and persisted with a single repository call. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
