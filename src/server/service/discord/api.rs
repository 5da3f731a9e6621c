use serde::de::DeserializeOwned;

use crate::server::{
    error::discord::DiscordApiError,
    model::discord::{DiscordUser, GuildMember, GuildSummary},
};

/// Client for Discord endpoints that act as the logged-in user.
///
/// Wraps the shared `reqwest::Client`, which carries the request timeout and never
/// follows redirects. Cloning is cheap.
#[derive(Clone)]
pub struct DiscordApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl DiscordApiClient {
    /// Creates a client against `base_url`, e.g. `https://discord.com/api/v10`.
    ///
    /// # Arguments
    /// - `http_client` - Shared HTTP client
    /// - `base_url` - API root without a trailing slash (one is stripped if present)
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http_client,
            base_url,
        }
    }

    /// Fetches the user the token belongs to.
    ///
    /// # Returns
    /// - `Ok(DiscordUser)` - The authenticated user
    /// - `Err(DiscordApiError::Status)` - Discord answered with a non-2xx status
    /// - `Err(DiscordApiError::Request)` - Transport failure, timeout or unexpected body
    pub async fn fetch_user(&self, access_token: &str) -> Result<DiscordUser, DiscordApiError> {
        self.get_json(access_token, "/users/@me".to_string()).await
    }

    /// Fetches every guild the user is a member of, with their effective permissions.
    pub async fn fetch_user_guilds(
        &self,
        access_token: &str,
    ) -> Result<Vec<GuildSummary>, DiscordApiError> {
        self.get_json(access_token, "/users/@me/guilds".to_string())
            .await
    }

    /// Fetches the user's member record in one guild. Requires the
    /// `guilds.members.read` scope.
    pub async fn fetch_guild_member(
        &self,
        access_token: &str,
        guild_id: &str,
    ) -> Result<GuildMember, DiscordApiError> {
        self.get_json(access_token, format!("/users/@me/guilds/{}/member", guild_id))
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        access_token: &str,
        endpoint: String,
    ) -> Result<T, DiscordApiError> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(access_token)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(source) => return Err(DiscordApiError::Request { endpoint, source }),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(DiscordApiError::Status { endpoint, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| DiscordApiError::Request { endpoint, source })
    }
}
