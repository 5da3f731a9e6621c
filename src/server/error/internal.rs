use std::num::ParseIntError;
use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to parse a Discord permission bitmask.
    ///
    /// Discord sends permissions as a decimal string; anything that is not an
    /// unsigned 64-bit integer lands here.
    #[error("Failed to parse permission bitmask '{value}': {source}")]
    ParsePermissions {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: ParseIntError,
    },

    /// A settings value did not match the kind declared for its key.
    ///
    /// Form validation guarantees value kinds before a patch is built, so reaching
    /// this indicates a bug in the caller.
    #[error("Setting '{key}' expects a {expected} value")]
    SettingKindMismatch {
        /// The setting key
        key: &'static str,
        /// Human-readable name of the expected kind
        expected: &'static str,
    },
}
