//! Authorization for viewing and editing a guild's bot configuration.

use serenity::all::Permissions;

use crate::server::{service::discord::DiscordApiClient, util::parse::parse_permissions};

/// Decides whether the logged-in user may administer a guild's bot config.
///
/// A user qualifies by holding Manage Guild in the guild, or by holding a role on
/// the guild's admin-role allow-list. The permission check is answered from the
/// guild list alone; only the role check reaches Discord, with at most one request.
pub struct GuildAccessResolver<'a> {
    discord: &'a DiscordApiClient,
}

impl<'a> GuildAccessResolver<'a> {
    /// Creates a new GuildAccessResolver.
    ///
    /// # Arguments
    /// - `discord` - User-token Discord client for the membership lookup
    pub fn new(discord: &'a DiscordApiClient) -> Self {
        Self { discord }
    }

    /// Whether the user may access the guild's configuration.
    ///
    /// Never fails: a membership lookup that errors for any reason (expired token,
    /// timeout, non-2xx) denies access and is logged at debug level.
    ///
    /// # Arguments
    /// - `access_token` - The user's OAuth access token
    /// - `guild_id` - Guild snowflake
    /// - `discord_permissions` - The user's permission bitmask in the guild, as the
    ///   decimal string from the guild list
    /// - `admin_roles` - The guild's stored admin-role allow-list, possibly empty
    ///
    /// # Returns
    /// - `true` - Manage Guild is set, or the user holds an allow-listed role
    /// - `false` - Otherwise
    pub async fn can_access_guild(
        &self,
        access_token: &str,
        guild_id: &str,
        discord_permissions: &str,
        admin_roles: &[String],
    ) -> bool {
        match parse_permissions(discord_permissions) {
            Ok(permissions) if permissions.contains(Permissions::MANAGE_GUILD) => return true,
            Ok(_) => {}
            Err(e) => tracing::warn!("Treating guild {} permissions as empty: {}", guild_id, e),
        }

        if admin_roles.is_empty() {
            return false;
        }

        match self
            .discord
            .fetch_guild_member(access_token, guild_id)
            .await
        {
            Ok(member) => member.has_any_role(admin_roles),
            Err(e) => {
                tracing::debug!("Denying access to guild {}: {}", guild_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{builder::TestBuilder, error::TestError, factory::guild::MANAGE_GUILD};

    const GUILD: &str = "100000000000000500";
    const ADMIN_ROLE: &str = "200000000000000001";
    const OTHER_ROLE: &str = "200000000000000002";

    fn allow_list() -> Vec<String> {
        vec![ADMIN_ROLE.to_string()]
    }

    #[tokio::test]
    async fn manage_guild_bit_grants_without_network_call() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_discord_api().build().await?;
        let discord = test.discord().await;
        let client = DiscordApiClient::new(reqwest::Client::new(), discord.base_url());

        let allowed = GuildAccessResolver::new(&client)
            .can_access_guild("token", GUILD, MANAGE_GUILD, &allow_list())
            .await;

        assert!(allowed);
        assert_eq!(discord.request_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn manage_guild_bit_is_found_in_large_bitmasks() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_discord_api().build().await?;
        let discord = test.discord().await;
        let client = DiscordApiClient::new(reqwest::Client::new(), discord.base_url());

        // Bits above 2^53 set alongside MANAGE_GUILD.
        let permissions = ((1u64 << 60) | (1 << 5) | 1).to_string();
        let allowed = GuildAccessResolver::new(&client)
            .can_access_guild("token", GUILD, &permissions, &[])
            .await;

        assert!(allowed);
        assert_eq!(discord.request_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn allow_listed_role_grants_access() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_discord_api().build().await?;
        let discord = test.discord().await;
        discord
            .mock_guild_member("token", GUILD, &[OTHER_ROLE, ADMIN_ROLE], 1)
            .await;
        let client = DiscordApiClient::new(reqwest::Client::new(), discord.base_url());

        let allowed = GuildAccessResolver::new(&client)
            .can_access_guild("token", GUILD, "0", &allow_list())
            .await;

        assert!(allowed);
        Ok(())
    }

    #[tokio::test]
    async fn no_role_overlap_denies_access() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_discord_api().build().await?;
        let discord = test.discord().await;
        discord
            .mock_guild_member("token", GUILD, &[OTHER_ROLE], 1)
            .await;
        let client = DiscordApiClient::new(reqwest::Client::new(), discord.base_url());

        let allowed = GuildAccessResolver::new(&client)
            .can_access_guild("token", GUILD, "68608", &allow_list())
            .await;

        assert!(!allowed);
        Ok(())
    }

    #[tokio::test]
    async fn member_lookup_failure_denies_access() -> Result<(), TestError> {
        for status in [401, 403, 500] {
            let mut test = TestBuilder::new().with_discord_api().build().await?;
            let discord = test.discord().await;
            discord.mock_guild_member_status(GUILD, status, 1).await;
            let client = DiscordApiClient::new(reqwest::Client::new(), discord.base_url());

            let allowed = GuildAccessResolver::new(&client)
                .can_access_guild("token", GUILD, "0", &allow_list())
                .await;

            assert!(!allowed, "status {}", status);
        }
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_discord_denies_access() {
        let client = DiscordApiClient::new(reqwest::Client::new(), "http://127.0.0.1:9");

        let allowed = GuildAccessResolver::new(&client)
            .can_access_guild("token", GUILD, "0", &allow_list())
            .await;

        assert!(!allowed);
    }

    #[tokio::test]
    async fn empty_allow_list_denies_without_lookup() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_discord_api().build().await?;
        let discord = test.discord().await;
        let client = DiscordApiClient::new(reqwest::Client::new(), discord.base_url());

        let allowed = GuildAccessResolver::new(&client)
            .can_access_guild("token", GUILD, "0", &[])
            .await;

        assert!(!allowed);
        assert_eq!(discord.request_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn unparsable_permissions_fall_through_to_role_check() -> Result<(), TestError> {
        let mut test = TestBuilder::new().with_discord_api().build().await?;
        let discord = test.discord().await;
        discord
            .mock_guild_member("token", GUILD, &[ADMIN_ROLE], 1)
            .await;
        let client = DiscordApiClient::new(reqwest::Client::new(), discord.base_url());

        let allowed = GuildAccessResolver::new(&client)
            .can_access_guild("token", GUILD, "not-a-number", &allow_list())
            .await;

        assert!(allowed);
        Ok(())
    }
}
