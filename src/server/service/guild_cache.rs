//! Short-lived cache of the visitor's Discord guild list.

use chrono::{DateTime, Duration, Utc};
use tower_sessions::Session;

use crate::server::{
    error::AppError,
    middleware::session::GuildListSession,
    model::{discord::GuildSummary, guild_list::CachedGuildList},
    service::discord::DiscordApiClient,
};

/// How long a fetched guild list is served from the session.
pub const GUILD_LIST_TTL_SECONDS: i64 = 300;

/// Serves `/users/@me/guilds` from the visitor's session for a few minutes.
///
/// Each session holds its own entry, so nothing is shared between visitors.
/// Concurrent refreshes within one session are last-writer-wins.
pub struct GuildListCache<'a> {
    session: &'a Session,
    discord: &'a DiscordApiClient,
}

impl<'a> GuildListCache<'a> {
    /// Creates a new GuildListCache.
    ///
    /// # Arguments
    /// - `session` - The visitor's session, where the entry lives
    /// - `discord` - User-token Discord client used on a miss
    pub fn new(session: &'a Session, discord: &'a DiscordApiClient) -> Self {
        Self { session, discord }
    }

    /// Returns the user's guilds, fetching them only when the cached entry is
    /// missing or expired.
    ///
    /// # Arguments
    /// - `access_token` - The user's OAuth access token
    ///
    /// # Returns
    /// - `Ok(Vec<GuildSummary>)` - Cached or freshly fetched guild list
    /// - `Err(AppError::DiscordApiErr(_))` - The fetch failed; no stale entry is served
    /// - `Err(AppError::SessionErr(_))` - Reading or writing the session failed
    pub async fn user_guilds(&self, access_token: &str) -> Result<Vec<GuildSummary>, AppError> {
        self.user_guilds_at(access_token, Utc::now()).await
    }

    /// Same as [`user_guilds`](Self::user_guilds) with an explicit clock.
    pub async fn user_guilds_at(
        &self,
        access_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<GuildSummary>, AppError> {
        let cache = GuildListSession::new(self.session);

        if let Some(cached) = cache.get().await? {
            if cached.is_fresh(now) {
                return Ok(cached.guilds);
            }
        }

        let guilds = self.discord.fetch_user_guilds(access_token).await?;
        tracing::debug!("Fetched {} guilds from Discord", guilds.len());

        let entry = CachedGuildList::new(
            guilds,
            now,
            Duration::seconds(GUILD_LIST_TTL_SECONDS),
        );
        cache.set(&entry).await?;

        Ok(entry.guilds)
    }
}
