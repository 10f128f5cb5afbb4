//! In-memory integration tests for the bot core.
//!
//! Tests are organized into modules by functionality:
//! - `team_flow_tests`: Creating and moving tasks end to end
//! - `configuration_tests`: Behaviour driven by TOML settings
//! - `planning_tests`: Weekly board, digest, overdue list and meetings
//! - `directory_tests`: Participant tracking as seen through the bot

#[path = "test_helpers/mod.rs"]
mod test_helpers;

mod in_memory {
    mod configuration_tests;
    mod directory_tests;
    mod planning_tests;
    mod team_flow_tests;
}
