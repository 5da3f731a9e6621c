use reqwest::StatusCode;
use thiserror::Error;

/// Failures calling the Discord REST API with a user's OAuth token.
#[derive(Error, Debug)]
pub enum DiscordApiError {
    /// The request never produced a response (connect failure, timeout, bad body).
    #[error("Discord request to {endpoint} failed: {source}")]
    Request {
        /// Path of the endpoint that was called
        endpoint: String,
        /// The underlying transport or decode error
        #[source]
        source: reqwest::Error,
    },

    /// Discord answered with a non-2xx status.
    #[error("Discord returned {status} for {endpoint}")]
    Status {
        /// Path of the endpoint that was called
        endpoint: String,
        /// The response status
        status: StatusCode,
    },
}

impl DiscordApiError {
    /// Whether Discord rejected the access token itself.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}
