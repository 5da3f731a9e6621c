use tower_sessions::Session;

use crate::server::{
    error::{auth::AuthError, AppError},
    middleware::session::{AuthSession, ReturnToSession},
    model::discord::DiscordUser,
};

/// Gate for routes that need a logged-in visitor.
pub struct AuthGuard<'a> {
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Returns the logged-in user and their Discord access token.
    ///
    /// When nobody is logged in, `return_to` is remembered so the login callback can
    /// send the visitor back to the page they asked for.
    ///
    /// # Arguments
    /// - `return_to` - Site path the visitor was trying to reach
    ///
    /// # Returns
    /// - `Ok((DiscordUser, String))` - User and access token from the session
    /// - `Err(AuthError::UserNotInSession)` - Not logged in
    pub async fn require(&self, return_to: &str) -> Result<(DiscordUser, String), AppError> {
        let auth = AuthSession::new(self.session);

        let user = auth.get_user().await?;
        let access_token = auth.get_access_token().await?;

        match (user, access_token) {
            (Some(user), Some(access_token)) => Ok((user, access_token)),
            _ => {
                ReturnToSession::new(self.session).set(return_to).await?;
                Err(AuthError::UserNotInSession.into())
            }
        }
    }
}
