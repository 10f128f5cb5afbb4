//! Port contracts for the participant directory.

pub mod repository;

pub use repository::{DirectoryError, DirectoryResult, UserDirectory};
