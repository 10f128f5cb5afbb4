//! Persistence adapters for the participant directory.

pub mod memory;
pub mod postgres;
