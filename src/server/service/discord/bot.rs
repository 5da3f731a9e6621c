use std::num::NonZeroU64;

use serenity::{all::GuildId, http::Http};

use crate::server::model::discord::{ChannelSummary, RoleSummary};

/// Guild lookups made with the bot token.
///
/// Every operation degrades instead of failing: the pages that use these lookups
/// still render with raw ids when Discord is unavailable.
pub struct DiscordBotService<'a> {
    http: &'a Http,
}

impl<'a> DiscordBotService<'a> {
    /// Creates a new DiscordBotService.
    ///
    /// # Arguments
    /// - `http` - Serenity HTTP client authenticated with the bot token
    pub fn new(http: &'a Http) -> Self {
        Self { http }
    }

    /// Whether the bot is a member of the guild.
    ///
    /// # Returns
    /// - `true` - Discord returned the guild to the bot
    /// - `false` - Any error, including an invalid id
    pub async fn is_bot_in_guild(&self, guild_id: &str) -> bool {
        let Some(id) = parse_guild_id(guild_id) else {
            return false;
        };

        match self.http.get_guild(id).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Bot not present in guild {}: {}", guild_id, e);
                false
            }
        }
    }

    /// The guild's roles as `{id, name}` pairs; empty on any error.
    pub async fn guild_roles(&self, guild_id: &str) -> Vec<RoleSummary> {
        let Some(id) = parse_guild_id(guild_id) else {
            return Vec::new();
        };

        match self.http.get_guild_roles(id).await {
            Ok(roles) => roles.iter().map(RoleSummary::from_serenity).collect(),
            Err(e) => {
                tracing::warn!("Failed to fetch roles for guild {}: {}", guild_id, e);
                Vec::new()
            }
        }
    }

    /// The guild's channels as `{id, name}` pairs; empty on any error.
    pub async fn guild_channels(&self, guild_id: &str) -> Vec<ChannelSummary> {
        let Some(id) = parse_guild_id(guild_id) else {
            return Vec::new();
        };

        match self.http.get_channels(id).await {
            Ok(channels) => channels.iter().map(ChannelSummary::from_serenity).collect(),
            Err(e) => {
                tracing::warn!("Failed to fetch channels for guild {}: {}", guild_id, e);
                Vec::new()
            }
        }
    }
}

/// Parses a guild snowflake; zero and non-numeric ids are rejected.
fn parse_guild_id(guild_id: &str) -> Option<GuildId> {
    guild_id.parse::<NonZeroU64>().ok().map(GuildId::from)
}
