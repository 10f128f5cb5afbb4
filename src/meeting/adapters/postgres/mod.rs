//! `PostgreSQL` adapter for the meeting log.

mod models;
mod repository;
mod schema;

pub use repository::{MeetingPgPool, PostgresMeetingRepository};
