//! `PostgreSQL` adapter for the participant directory.

mod models;
mod repository;
mod schema;

pub use repository::{DirectoryPgPool, PostgresUserDirectory};
