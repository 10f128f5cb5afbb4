//! Unit tests for the participant directory.
