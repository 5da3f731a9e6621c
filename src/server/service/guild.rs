//! Guild configuration use cases: listing, viewing and editing a guild's bot config.
//!
//! Every operation on a single guild goes through the same authorization: the guild
//! must be in the user's (cached) guild list, and the user must hold Manage Guild
//! there or one of the guild's configured admin roles.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serenity::http::Http;
use tower_sessions::Session;

use crate::server::{
    data::{guild_config::GuildConfigRepository, unit::UnitRepository},
    error::{auth::AuthError, AppError},
    model::{
        discord::GuildSummary,
        form::guild::{GuildEventForm, GuildSettingsForm},
        guild::{GuildConfig, GuildEvent},
        guild_view::{AccessibleGuild, GuildView},
        settings::{DefaultSettings, SettingsUpdate},
    },
    service::{
        access::GuildAccessResolver,
        discord::{DiscordApiClient, DiscordBotService},
        guild_cache::GuildListCache,
        settings::SettingsReconciler,
    },
};

/// The logged-in user a guild operation is performed for.
pub struct Requester<'a> {
    pub session: &'a Session,
    pub user_id: &'a str,
    pub access_token: &'a str,
}

/// Service for guild configuration pages and edits.
pub struct GuildService<'a> {
    bot_db: &'a mongodb::Database,
    swapi_db: &'a mongodb::Database,
    discord: &'a DiscordApiClient,
    bot_http: &'a Http,
    defaults: &'a DefaultSettings,
}

impl<'a> GuildService<'a> {
    /// Creates a new GuildService instance.
    ///
    /// # Arguments
    /// - `bot_db` - The bot's database (`guildConfigs`)
    /// - `swapi_db` - Game data database (`units`)
    /// - `discord` - User-token Discord client
    /// - `bot_http` - Bot-token Discord client
    /// - `defaults` - Default value per guild setting
    pub fn new(
        bot_db: &'a mongodb::Database,
        swapi_db: &'a mongodb::Database,
        discord: &'a DiscordApiClient,
        bot_http: &'a Http,
        defaults: &'a DefaultSettings,
    ) -> Self {
        Self {
            bot_db,
            swapi_db,
            discord,
            bot_http,
            defaults,
        }
    }

    /// Lists the guilds whose config the user may open.
    ///
    /// Guilds with a stored config are listed when the access check passes against
    /// the config's admin roles. Guilds without one are listed when the user holds
    /// Manage Guild and the bot is a member. All checks run concurrently.
    ///
    /// # Returns
    /// - `Ok(Vec<AccessibleGuild>)` - Guilds with config first, in guild list order
    /// - `Err(AppError::DiscordApiErr(_))` - Fetching the guild list failed
    /// - `Err(AppError::MongoErr(_))` - Loading the configs failed
    pub async fn accessible_guilds(
        &self,
        requester: &Requester<'_>,
    ) -> Result<Vec<AccessibleGuild>, AppError> {
        let guilds = GuildListCache::new(requester.session, self.discord)
            .user_guilds(requester.access_token)
            .await?;
        let guild_ids: Vec<String> = guilds.iter().map(|guild| guild.id.clone()).collect();
        let configs = GuildConfigRepository::new(self.bot_db)
            .find_many(&guild_ids)
            .await?;

        let (configured, unconfigured) = partition_guilds(guilds, configs);

        let resolver = GuildAccessResolver::new(self.discord);
        let configured_checks = configured.iter().map(|(guild, config)| {
            resolver.can_access_guild(
                requester.access_token,
                &guild.id,
                &guild.permissions,
                config.settings.admin_roles(),
            )
        });

        let bot = DiscordBotService::new(self.bot_http);
        let presence_checks = unconfigured
            .iter()
            .map(|guild| bot.is_bot_in_guild(&guild.id));

        let (configured_allowed, bot_present) =
            tokio::join!(join_all(configured_checks), join_all(presence_checks));

        let with_config = configured
            .into_iter()
            .zip(configured_allowed)
            .filter(|(_, allowed)| *allowed)
            .map(|((guild, config), _)| AccessibleGuild {
                guild,
                config: Some(config),
            });
        let without_config = unconfigured
            .into_iter()
            .zip(bot_present)
            .filter(|(_, present)| *present)
            .map(|(guild, _)| AccessibleGuild {
                guild,
                config: None,
            });

        Ok(with_config.chain(without_config).collect())
    }

    /// Loads the guild config page.
    ///
    /// Role names, channel names and unit names are fetched concurrently. A guild the
    /// bot has no config for is shown with empty maps and default settings.
    ///
    /// # Returns
    /// - `Ok(GuildView)` - The page data
    /// - `Err(AppError::AuthErr(AccessDenied))` - Guild not in the user's list or access check failed
    /// - `Err(AppError::DiscordApiErr(_))` - Fetching the guild list failed
    /// - `Err(AppError::MongoErr(_))` - Loading the config or unit names failed
    pub async fn view(
        &self,
        requester: &Requester<'_>,
        guild_id: &str,
    ) -> Result<GuildView, AppError> {
        let (guild, config) = self.authorize(requester, guild_id).await?;

        let Some(config) = config else {
            return Ok(self.with_defaults(GuildView {
                guild,
                config: None,
                effective_settings: Default::default(),
                roles: Default::default(),
                channels: Default::default(),
                unit_names: Default::default(),
            }));
        };

        let bot = DiscordBotService::new(self.bot_http);
        let unit_ids = config.settings.referenced_unit_ids();
        let units = UnitRepository::new(self.swapi_db);

        let (roles, channels, unit_names) = tokio::join!(
            bot.guild_roles(guild_id),
            bot.guild_channels(guild_id),
            units.names(&unit_ids),
        );

        Ok(GuildView {
            guild,
            effective_settings: config.settings.effective(self.defaults),
            config: Some(config),
            roles: roles.into_iter().map(|role| (role.id, role.name)).collect(),
            channels: channels
                .into_iter()
                .map(|channel| (channel.id, channel.name))
                .collect(),
            unit_names: unit_names?,
        })
    }

    /// Validates and stores a settings form.
    ///
    /// Values equal to the bot's default are unset, others are set. Admin roles and
    /// welcome/part messages are stored as submitted.
    ///
    /// # Returns
    /// - `Ok(SettingsUpdate)` - The update that was applied (possibly empty)
    /// - `Err(AppError::NotFound(_))` - The bot has no config for this guild
    /// - `Err(AppError::BadRequest(_))` - The form failed validation
    /// - `Err(AppError::AuthErr(AccessDenied))` - Access check failed
    pub async fn update_settings(
        &self,
        requester: &Requester<'_>,
        guild_id: &str,
        form: GuildSettingsForm,
    ) -> Result<SettingsUpdate, AppError> {
        self.require_config(requester, guild_id).await?;

        let update = self.settings_update(form)?;

        GuildConfigRepository::new(self.bot_db)
            .update_settings(guild_id, &update)
            .await?;

        tracing::info!(
            "User {} updated settings of guild {}: set [{}] unset [{}]",
            requester.user_id,
            guild_id,
            update.set_keys().collect::<Vec<_>>().join(", "),
            update.unset_keys().collect::<Vec<_>>().join(", ")
        );

        Ok(update)
    }

    /// Adds an event, or replaces the event with the same name.
    ///
    /// # Returns
    /// - `Ok(Vec<GuildEvent>)` - The guild's events after the change
    /// - `Err(AppError::BadRequest(_))` - The form failed validation
    /// - `Err(AppError::NotFound(_))` - The bot has no config for this guild
    pub async fn upsert_event(
        &self,
        requester: &Requester<'_>,
        guild_id: &str,
        form: GuildEventForm,
        now: DateTime<Utc>,
    ) -> Result<Vec<GuildEvent>, AppError> {
        let mut config = self.require_config(requester, guild_id).await?;

        let event = form.validate(now)?;
        let name = event.name.clone();
        config.upsert_event(event);

        let events = config.events.unwrap_or_default();
        GuildConfigRepository::new(self.bot_db)
            .update_events(guild_id, &events)
            .await?;

        tracing::info!(
            "User {} saved event '{}' in guild {}",
            requester.user_id,
            name,
            guild_id
        );

        Ok(events)
    }

    /// Removes the named event.
    ///
    /// # Returns
    /// - `Ok(Vec<GuildEvent>)` - The guild's events after the change
    /// - `Err(AppError::NotFound(_))` - No config, or no event with that name
    pub async fn delete_event(
        &self,
        requester: &Requester<'_>,
        guild_id: &str,
        name: &str,
    ) -> Result<Vec<GuildEvent>, AppError> {
        let mut config = self.require_config(requester, guild_id).await?;

        if !config.remove_event(name) {
            return Err(AppError::NotFound(format!("Event '{}' not found", name)));
        }

        let events = config.events.unwrap_or_default();
        GuildConfigRepository::new(self.bot_db)
            .update_events(guild_id, &events)
            .await?;

        tracing::info!(
            "User {} deleted event '{}' in guild {}",
            requester.user_id,
            name,
            guild_id
        );

        Ok(events)
    }

    /// Turns a submitted form into the storage update: defaultable values are
    /// reconciled, pass-through values are set as submitted.
    fn settings_update(&self, form: GuildSettingsForm) -> Result<SettingsUpdate, AppError> {
        let validated = form.validate()?;
        let mut update = SettingsReconciler::new(self.defaults)
            .diff_from_defaults(&validated.patch)
            .into_update();
        validated.merge_pass_through(&mut update);

        Ok(update)
    }

    /// Authorizes the requester and returns the guild's stored config, which must exist.
    async fn require_config(
        &self,
        requester: &Requester<'_>,
        guild_id: &str,
    ) -> Result<GuildConfig, AppError> {
        let (_, config) = self.authorize(requester, guild_id).await?;

        stored_config(config)
    }

    /// Loads the config and the user's guild list concurrently, then checks access.
    async fn authorize(
        &self,
        requester: &Requester<'_>,
        guild_id: &str,
    ) -> Result<(GuildSummary, Option<GuildConfig>), AppError> {
        let repo = GuildConfigRepository::new(self.bot_db);
        let cache = GuildListCache::new(requester.session, self.discord);

        let (config, guilds) = tokio::try_join!(
            repo.find(guild_id),
            cache.user_guilds(requester.access_token)
        )?;

        let guild = self
            .check_access(requester, guild_id, guilds, config.as_ref())
            .await?;

        Ok((guild, config))
    }

    async fn check_access(
        &self,
        requester: &Requester<'_>,
        guild_id: &str,
        guilds: Vec<GuildSummary>,
        config: Option<&GuildConfig>,
    ) -> Result<GuildSummary, AppError> {
        let denied = || AuthError::AccessDenied {
            user_id: requester.user_id.to_string(),
            guild_id: guild_id.to_string(),
        };

        let Some(guild) = guilds.into_iter().find(|guild| guild.id == guild_id) else {
            return Err(denied().into());
        };

        let admin_roles = config
            .map(|config| config.settings.admin_roles())
            .unwrap_or_default();

        let allowed = GuildAccessResolver::new(self.discord)
            .can_access_guild(
                requester.access_token,
                guild_id,
                &guild.permissions,
                admin_roles,
            )
            .await;

        if !allowed {
            return Err(denied().into());
        }

        Ok(guild)
    }

    fn with_defaults(&self, mut view: GuildView) -> GuildView {
        view.effective_settings = self
            .defaults
            .iter()
            .map(|(key, default)| (key.as_str(), default.clone()))
            .collect();
        view
    }
}

/// Edits need a config the bot already created; the store never upserts.
fn stored_config(config: Option<GuildConfig>) -> Result<GuildConfig, AppError> {
    config.ok_or_else(|| AppError::NotFound("Guild config not found".to_string()))
}

/// Splits the user's guilds into those with a stored config and those the user
/// manages that have none. Guilds in neither group are dropped. Both groups keep
/// guild list order.
fn partition_guilds(
    guilds: Vec<GuildSummary>,
    configs: Vec<GuildConfig>,
) -> (Vec<(GuildSummary, GuildConfig)>, Vec<GuildSummary>) {
    let mut configs: std::collections::HashMap<String, GuildConfig> = configs
        .into_iter()
        .map(|config| (config.guild_id.clone(), config))
        .collect();

    let mut configured = Vec::new();
    let mut unconfigured = Vec::new();

    for guild in guilds {
        match configs.remove(&guild.id) {
            Some(config) => configured.push((guild, config)),
            None if guild.can_manage() => unconfigured.push(guild),
            None => {}
        }
    }

    (configured, unconfigured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::guild::GuildSettings;
    use mongodb::bson::doc;
    use pretty_assertions::assert_eq;
    use test_utils::{
        builder::TestBuilder,
        error::TestError,
        factory::guild::{GuildFactory, MANAGE_GUILD, MEMBER},
    };

    const ADMIN_ROLE: &str = "200000000000000001";

    fn summary(id: &str, permissions: &str) -> GuildSummary {
        GuildSummary {
            id: id.to_string(),
            name: format!("Guild {}", id),
            icon: None,
            permissions: permissions.to_string(),
        }
    }

    fn config(guild_id: &str, admin_roles: &[&str]) -> GuildConfig {
        GuildConfig {
            guild_id: guild_id.to_string(),
            settings: GuildSettings {
                admin_role: Some(admin_roles.iter().map(|r| r.to_string()).collect()),
                ..Default::default()
            },
            events: None,
        }
    }

    #[test]
    fn partition_keeps_configured_and_managed_guilds() {
        let guilds = vec![
            summary("1", MEMBER),
            summary("2", MANAGE_GUILD),
            summary("3", MEMBER),
            summary("4", MANAGE_GUILD),
        ];
        let configs = vec![config("3", &[]), config("4", &[]), config("9", &[])];

        let (configured, unconfigured) = partition_guilds(guilds, configs);

        let configured_ids: Vec<&str> = configured.iter().map(|(g, _)| g.id.as_str()).collect();
        let unconfigured_ids: Vec<&str> = unconfigured.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(configured_ids, vec!["3", "4"]);
        assert_eq!(unconfigured_ids, vec!["2"]);
    }

    /// Builds a service whose MongoDB handles are never queried by the code under test.
    async fn offline_databases() -> (mongodb::Database, mongodb::Database) {
        let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:9")
            .await
            .unwrap();
        (client.database("bot"), client.database("swapi"))
    }

    #[tokio::test]
    async fn guild_missing_from_user_list_is_denied() -> Result<(), TestError> {
        let mut test = TestBuilder::new()
            .with_session()
            .with_discord_api()
            .build()
            .await?;
        let (session, discord_mock) = test.session_and_discord().await?;
        let discord = DiscordApiClient::new(reqwest::Client::new(), discord_mock.base_url());
        let http = Http::new("bot-token");
        let defaults = DefaultSettings::bot_defaults();
        let (bot_db, swapi_db) = offline_databases().await;
        let service = GuildService::new(&bot_db, &swapi_db, &discord, &http, &defaults);
        let requester = Requester {
            session,
            user_id: "300000000000000001",
            access_token: "token",
        };

        let result = service
            .check_access(
                &requester,
                "100000000000000777",
                vec![summary("100000000000000778", MANAGE_GUILD)],
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::AuthErr(AuthError::AccessDenied { .. }))
        ));
        assert_eq!(discord_mock.request_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn admin_role_from_config_grants_access() -> Result<(), TestError> {
        let mut test = TestBuilder::new()
            .with_session()
            .with_discord_api()
            .build()
            .await?;
        let (session, discord_mock) = test.session_and_discord().await?;
        let guild = GuildFactory::new().permissions(MEMBER).build();
        let guild_id = guild["id"].as_str().unwrap().to_string();
        discord_mock
            .mock_guild_member("token", &guild_id, &[ADMIN_ROLE], 1)
            .await;
        let discord = DiscordApiClient::new(reqwest::Client::new(), discord_mock.base_url());
        let http = Http::new("bot-token");
        let defaults = DefaultSettings::bot_defaults();
        let (bot_db, swapi_db) = offline_databases().await;
        let service = GuildService::new(&bot_db, &swapi_db, &discord, &http, &defaults);
        let requester = Requester {
            session,
            user_id: "300000000000000001",
            access_token: "token",
        };
        let guilds: Vec<GuildSummary> = serde_json::from_value(serde_json::json!([guild])).unwrap();
        let stored = config(&guild_id, &[ADMIN_ROLE]);

        let allowed = service
            .check_access(&requester, &guild_id, guilds, Some(&stored))
            .await
            .unwrap();

        assert_eq!(allowed.id, guild_id);
        Ok(())
    }

    #[tokio::test]
    async fn no_config_and_no_manage_guild_is_denied() -> Result<(), TestError> {
        let mut test = TestBuilder::new()
            .with_session()
            .with_discord_api()
            .build()
            .await?;
        let (session, discord_mock) = test.session_and_discord().await?;
        let discord = DiscordApiClient::new(reqwest::Client::new(), discord_mock.base_url());
        let http = Http::new("bot-token");
        let defaults = DefaultSettings::bot_defaults();
        let (bot_db, swapi_db) = offline_databases().await;
        let service = GuildService::new(&bot_db, &swapi_db, &discord, &http, &defaults);
        let requester = Requester {
            session,
            user_id: "300000000000000001",
            access_token: "token",
        };

        let result = service
            .check_access(
                &requester,
                "100000000000000777",
                vec![summary("100000000000000777", MEMBER)],
                None,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(discord_mock.request_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn view_without_config_shows_defaults() -> Result<(), TestError> {
        let http = Http::new("bot-token");
        let discord = DiscordApiClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let defaults = DefaultSettings::bot_defaults();
        let (bot_db, swapi_db) = offline_databases().await;
        let service = GuildService::new(&bot_db, &swapi_db, &discord, &http, &defaults);

        let view = service.with_defaults(GuildView {
            guild: summary("1", MANAGE_GUILD),
            config: None,
            effective_settings: Default::default(),
            roles: Default::default(),
            channels: Default::default(),
            unit_names: Default::default(),
        });

        assert_eq!(view.effective_settings.len(), 9);
        assert_eq!(
            view.effective_settings["timezone"],
            crate::server::model::settings::SettingValue::Text("America/New_York".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn settings_form_becomes_minimal_update() {
        let http = Http::new("bot-token");
        let discord = DiscordApiClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let defaults = DefaultSettings::bot_defaults();
        let (bot_db, swapi_db) = offline_databases().await;
        let service = GuildService::new(&bot_db, &swapi_db, &discord, &http, &defaults);
        let form = GuildSettingsForm {
            timezone: Some("America/New_York".to_string()),
            event_countdown: Some("30, 10".to_string()),
            admin_role: Some(vec![]),
            ..Default::default()
        };

        let update = service.settings_update(form).unwrap();

        assert_eq!(
            update.to_document(),
            Some(doc! {
                "$set": { "settings.eventCountdown": [30, 10], "settings.adminRole": [] },
                "$unset": { "settings.timezone": 1 },
            })
        );
    }

    #[tokio::test]
    async fn invalid_settings_form_produces_no_update() {
        let http = Http::new("bot-token");
        let discord = DiscordApiClient::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let defaults = DefaultSettings::bot_defaults();
        let (bot_db, swapi_db) = offline_databases().await;
        let service = GuildService::new(&bot_db, &swapi_db, &discord, &http, &defaults);
        let form = GuildSettingsForm {
            timezone: Some("Mars/Olympus".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            service.settings_update(form),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn edits_require_a_stored_config() {
        assert!(matches!(stored_config(None), Err(AppError::NotFound(_))));

        let stored = stored_config(Some(config("100000000000000777", &[]))).unwrap();
        assert_eq!(stored.guild_id, "100000000000000777");
    }
}
