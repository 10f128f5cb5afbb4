//! Persistence adapters for tasks.

pub mod memory;
pub mod postgres;
