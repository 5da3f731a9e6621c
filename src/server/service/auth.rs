use oauth2::{AuthorizationCode, CsrfToken, Scope, TokenResponse};
use url::Url;

use crate::server::{
    error::{auth::AuthError, AppError},
    model::discord::DiscordUser,
    service::discord::DiscordApiClient,
    state::OAuth2Client,
};

/// Scopes requested at login: identity, guild list, and per-guild member roles.
const SCOPES: [&str; 3] = ["identify", "guilds", "guilds.members.read"];

/// A completed OAuth login.
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user: DiscordUser,
    /// Bearer token for later user-scoped Discord calls.
    pub access_token: String,
}

/// Service for the Discord OAuth2 login round trip.
///
/// Builds the authorize URL and turns the callback's authorization code into an
/// access token plus the Discord user it belongs to. Session handling stays in the
/// controller.
pub struct AuthService<'a> {
    /// HTTP client for the token exchange.
    pub http_client: &'a reqwest::Client,
    /// OAuth2 client for Discord authentication flow.
    pub oauth_client: &'a OAuth2Client,
    /// User-token Discord client for `/users/@me`.
    pub discord: &'a DiscordApiClient,
}

impl<'a> AuthService<'a> {
    /// Creates a new AuthService instance.
    ///
    /// # Arguments
    /// - `http_client` - Reference to the HTTP client used for the token exchange
    /// - `oauth_client` - Reference to the configured OAuth2 client
    /// - `discord` - Reference to the user-token Discord client
    ///
    /// # Returns
    /// - `AuthService` - New service instance
    pub fn new(
        http_client: &'a reqwest::Client,
        oauth_client: &'a OAuth2Client,
        discord: &'a DiscordApiClient,
    ) -> Self {
        Self {
            http_client,
            oauth_client,
            discord,
        }
    }

    /// Generates a Discord OAuth2 login URL with CSRF protection.
    ///
    /// # Returns
    /// - `(Url, CsrfToken)` - Tuple containing the authorization URL and CSRF state token
    pub fn login_url(&self) -> (Url, CsrfToken) {
        let mut request = self.oauth_client.authorize_url(CsrfToken::new_random);
        for scope in SCOPES {
            request = request.add_scope(Scope::new(scope.to_string()));
        }

        request.url()
    }

    /// Handles the OAuth2 callback.
    ///
    /// Exchanges the authorization code for an access token, then fetches the Discord
    /// user the token belongs to.
    ///
    /// # Arguments
    /// - `authorization_code` - OAuth2 authorization code from Discord callback
    ///
    /// # Returns
    /// - `Ok(AuthenticatedUser)` - The user and their access token
    /// - `Err(AppError::AuthErr(TokenExchange))` - Discord refused the code or the exchange failed
    /// - `Err(AppError::DiscordApiErr(_))` - Failed to fetch the user with the new token
    pub async fn callback(&self, authorization_code: String) -> Result<AuthenticatedUser, AppError> {
        let token = self
            .oauth_client
            .exchange_code(AuthorizationCode::new(authorization_code))
            .request_async(self.http_client)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let access_token = token.access_token().secret().to_string();
        let user = self.discord.fetch_user(&access_token).await?;

        tracing::info!("User {} ({}) logged in", user.username, user.id);

        Ok(AuthenticatedUser { user, access_token })
    }
}
