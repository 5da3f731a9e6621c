//! Type-safe session management wrappers.
//!
//! This module provides type-safe interfaces for managing different aspects of user sessions,
//! organized by concern. Each struct handles a specific domain of session data, preventing
//! typos, ensuring type consistency, and centralizing session-related logic.
//!
//! # Architecture
//!
//! Session management is split into focused concerns:
//! - `AuthSession` - Authenticated Discord user and their OAuth access token
//! - `CsrfSession` - OAuth state token for the login round trip
//! - `ReturnToSession` - Where to send the visitor after login
//! - `GuildListSession` - The visitor's cached guild list
//!
//! Each struct wraps the same underlying `Session` but exposes only the methods
//! relevant to its concern.

use tower_sessions::Session;

use crate::server::{
    error::AppError,
    model::{discord::DiscordUser, guild_list::CachedGuildList},
};

// Session key constants
const SESSION_AUTH_USER: &str = "auth:user";
const SESSION_AUTH_ACCESS_TOKEN: &str = "auth:access_token";
const SESSION_AUTH_CSRF_TOKEN: &str = "auth:csrf_token";
const SESSION_AUTH_RETURN_TO: &str = "auth:return_to";
const SESSION_CACHE_GUILDS: &str = "cache:guilds";

/// Authentication session management.
///
/// Handles the logged-in user and the OAuth access token used for Discord calls
/// made on their behalf.
pub struct AuthSession<'a> {
    /// The underlying tower-sessions Session instance.
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    /// Creates a new AuthSession wrapper.
    ///
    /// # Arguments
    /// - `session` - Reference to the tower-sessions Session to wrap
    ///
    /// # Returns
    /// A new AuthSession instance
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores the authenticated user and their access token.
    ///
    /// Called after a successful OAuth callback, once the session id has been cycled.
    ///
    /// # Arguments
    /// - `user` - The Discord user returned by `/users/@me`
    /// - `access_token` - OAuth access token for user-scoped Discord calls
    ///
    /// # Returns
    /// - `Ok(())` - Both values stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn login(&self, user: &DiscordUser, access_token: &str) -> Result<(), AppError> {
        self.session.insert(SESSION_AUTH_USER, user).await?;
        self.session
            .insert(SESSION_AUTH_ACCESS_TOKEN, access_token)
            .await?;
        Ok(())
    }

    /// Retrieves the authenticated user.
    ///
    /// # Returns
    /// - `Ok(Some(user))` - User is logged in
    /// - `Ok(None)` - No user in session (not logged in)
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn get_user(&self) -> Result<Option<DiscordUser>, AppError> {
        Ok(self.session.get(SESSION_AUTH_USER).await?)
    }

    /// Retrieves the OAuth access token stored at login.
    pub async fn get_access_token(&self) -> Result<Option<String>, AppError> {
        Ok(self.session.get(SESSION_AUTH_ACCESS_TOKEN).await?)
    }

    /// Drops all session data and issues a new session id.
    ///
    /// Used right before storing the user at login. A session id planted before
    /// authentication cannot be reused afterwards, and nothing cached for an earlier
    /// identity (such as the guild list) carries over to the new one.
    pub async fn regenerate(&self) -> Result<(), AppError> {
        self.session.clear().await;
        self.session.cycle_id().await?;
        Ok(())
    }

    /// Deletes the session from the store and clears its data.
    ///
    /// Used during logout.
    pub async fn flush(&self) -> Result<(), AppError> {
        self.session.flush().await?;
        Ok(())
    }
}

/// CSRF protection session management.
///
/// Handles CSRF token storage and validation for OAuth flows. Tokens are stored
/// during login initiation and validated during the OAuth callback.
pub struct CsrfSession<'a> {
    /// The underlying tower-sessions Session instance.
    session: &'a Session,
}

impl<'a> CsrfSession<'a> {
    /// Creates a new CsrfSession wrapper.
    ///
    /// # Arguments
    /// - `session` - Reference to the tower-sessions Session to wrap
    ///
    /// # Returns
    /// A new CsrfSession instance
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores a CSRF token in the session.
    ///
    /// # Arguments
    /// - `token` - The CSRF token to store
    ///
    /// # Returns
    /// - `Ok(())` - Token successfully stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn set_token(&self, token: &str) -> Result<(), AppError> {
        self.session.insert(SESSION_AUTH_CSRF_TOKEN, token).await?;
        Ok(())
    }

    /// Retrieves and removes the CSRF token from the session.
    ///
    /// The token is removed so each one can only be used once.
    ///
    /// # Returns
    /// - `Ok(Some(token))` - CSRF token was found and removed
    /// - `Ok(None)` - No CSRF token in session
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn take_token(&self) -> Result<Option<String>, AppError> {
        let token = self.session.remove(SESSION_AUTH_CSRF_TOKEN).await?;
        Ok(token)
    }
}

/// Post-login destination.
pub struct ReturnToSession<'a> {
    session: &'a Session,
}

impl<'a> ReturnToSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Remembers a site-relative path to return to after login.
    pub async fn set(&self, path: &str) -> Result<(), AppError> {
        self.session.insert(SESSION_AUTH_RETURN_TO, path).await?;
        Ok(())
    }

    /// Retrieves and removes the stored path.
    pub async fn take(&self) -> Result<Option<String>, AppError> {
        Ok(self.session.remove(SESSION_AUTH_RETURN_TO).await?)
    }
}

/// The visitor's cached guild list.
///
/// Stored under a single key and always replaced as a whole.
pub struct GuildListSession<'a> {
    session: &'a Session,
}

impl<'a> GuildListSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Reads the cached entry, fresh or not.
    pub async fn get(&self) -> Result<Option<CachedGuildList>, AppError> {
        Ok(self.session.get(SESSION_CACHE_GUILDS).await?)
    }

    /// Replaces the cached entry.
    pub async fn set(&self, cached: &CachedGuildList) -> Result<(), AppError> {
        self.session.insert(SESSION_CACHE_GUILDS, cached).await?;
        Ok(())
    }
}
