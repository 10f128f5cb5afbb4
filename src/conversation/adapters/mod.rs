//! Adapters for the conversational core.

pub mod memory;
