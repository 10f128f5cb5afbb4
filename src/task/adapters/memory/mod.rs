//! In-memory adapter implementations for tests and local runs.

mod task;

pub use task::InMemoryTaskRepository;
