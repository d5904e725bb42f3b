//! Server test support utilities
//!
//! Shared by the server's unit tests and integration test binaries: unified
//! logging initialization and unique test data helpers.

pub mod logging;
pub mod unique_helpers;
