//! Integration tests for outpost CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! They are slower and should be run separately from unit tests.

mod cli_tests;
mod render_command;
mod up_command;
mod validate_command;
