//! Unique test data, so rows created by one test never collide with another's.

use ulid::Ulid;

/// `{prefix}-{ulid}`, lowercased so it is also a valid catalog slug.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("item");
/// assert!(a.starts_with("item-"));
/// assert_ne!(a, unique_str("item"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new().to_string().to_lowercase())
}

/// A unique username for accounts created outside the seeder.
pub fn unique_username(prefix: &str) -> String {
    unique_str(prefix).replace('-', "_")
}
