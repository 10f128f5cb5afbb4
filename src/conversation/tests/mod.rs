//! Unit tests for the conversational core.

mod dialog_tests;
mod session_tests;
