use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No authenticated user in the session.
    ///
    /// Results in a 401 Unauthorized response. The requested path has already been
    /// stored in the session so login can return the visitor to it.
    #[error("No authenticated user in session")]
    UserNotInSession,

    /// OAuth state validation failed during the callback.
    ///
    /// The state token in the OAuth callback URL does not match the token stored
    /// in the session, indicating a potential CSRF attack or an invalid callback request.
    /// Results in a 403 Forbidden response.
    #[error("Failed to login user due to OAuth state mismatch")]
    CsrfValidationFailed,

    /// User is logged in but may not view or edit the requested guild.
    ///
    /// Results in a 403 Forbidden response.
    #[error("User {user_id} denied access to guild {guild_id}")]
    AccessDenied {
        /// Discord ID of the user
        user_id: String,
        /// Discord ID of the guild
        guild_id: String,
    },

    /// Discord rejected the session's access token.
    ///
    /// The token expired or was revoked. Results in a 401 Unauthorized response so the
    /// client sends the visitor through login again.
    #[error("Discord rejected the stored access token")]
    DiscordSessionExpired,

    /// Exchanging the OAuth authorization code for a token failed.
    ///
    /// Results in a 500 Internal Server Error with a generic message.
    #[error("Failed to exchange authorization code: {0}")]
    TokenExchange(String),
}

/// Converts authentication errors into HTTP responses.
///
/// Maps authentication errors to appropriate HTTP status codes and user-friendly error messages:
/// - `UserNotInSession` / `DiscordSessionExpired` → 401 Unauthorized
/// - `CsrfValidationFailed` / `AccessDenied` → 403 Forbidden
/// - `TokenExchange` → 500 Internal Server Error with generic message
///
/// All errors are logged at debug level for diagnostics while keeping client-facing messages
/// generic to avoid information leakage.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::UserNotInSession => (StatusCode::UNAUTHORIZED, "You must be logged in."),
            Self::DiscordSessionExpired => (
                StatusCode::UNAUTHORIZED,
                "Your Discord session has expired, please log in again.",
            ),
            Self::CsrfValidationFailed => (
                StatusCode::FORBIDDEN,
                "Invalid OAuth state. Please try logging in again.",
            ),
            Self::AccessDenied { .. } => (
                StatusCode::FORBIDDEN,
                "You do not have access to this server's configuration.",
            ),
            Self::TokenExchange(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "There was an issue logging you in, please try again.",
            ),
        };

        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
