//! Step definitions for keyword proposal scenarios.

pub mod world;

mod given;
mod then;
mod when;
