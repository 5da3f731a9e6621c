//! Shared helper utilities for factory methods.

/// Counter for generating unique IDs in tests.
///
/// This atomic counter ensures each factory-created payload gets a unique
/// identifier to prevent collisions in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Base added to the counter so generated ids look like real 18-digit snowflakes.
const SNOWFLAKE_BASE: u64 = 100_000_000_000_000_000;

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Gets the next unique snowflake as a string, the way Discord transmits ids.
///
/// # Returns
/// - `String` - 18-digit decimal snowflake
pub fn next_snowflake() -> String {
    (SNOWFLAKE_BASE + next_id()).to_string()
}
