//! Test helpers for generating unique test data
//!
//! ULID suffixes keep player names unique across tests that share a database.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use server_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("player");
/// let id2 = unique_str("player");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique player display name.
///
/// Lowercased so it stays a valid name for case-insensitive lookups.
pub fn unique_name(prefix: &str) -> String {
    unique_str(prefix).to_lowercase()
}
