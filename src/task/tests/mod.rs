//! Unit tests for the task context.

mod memory_tests;
