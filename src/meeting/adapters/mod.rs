//! Persistence adapters for the meeting log.

pub mod memory;
pub mod postgres;
