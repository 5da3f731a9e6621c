use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The application requires this environment variable to be defined. Check the
    /// documentation or `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but its value cannot be used.
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar {
        /// Name of the offending variable
        var: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A configured URL (OAuth endpoints, redirect URL) failed to parse.
    #[error("Invalid URL in {var}: {source}")]
    InvalidUrl {
        /// Name of the variable or endpoint holding the URL
        var: String,
        /// The underlying parse error
        #[source]
        source: url::ParseError,
    },
}
