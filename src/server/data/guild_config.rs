//! Repository for the bot's `guildConfigs` collection.
//!
//! The bot creates these documents when it joins a guild; the website only reads
//! and patches them and never upserts.

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Collection, Database,
};

use crate::server::{
    error::AppError,
    model::{
        guild::{GuildConfig, GuildEvent},
        settings::SettingsUpdate,
    },
};

pub const GUILD_CONFIGS_COLLECTION: &str = "guildConfigs";

/// Repository providing operations on stored guild configurations.
pub struct GuildConfigRepository {
    collection: Collection<GuildConfig>,
}

impl GuildConfigRepository {
    /// Creates a new GuildConfigRepository instance.
    ///
    /// # Arguments
    /// - `db` - The bot's database
    ///
    /// # Returns
    /// - `GuildConfigRepository` - New repository instance
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(GUILD_CONFIGS_COLLECTION),
        }
    }

    /// Finds one guild's config.
    ///
    /// # Returns
    /// - `Ok(Some(GuildConfig))` - The stored config
    /// - `Ok(None)` - The bot has no config for this guild
    /// - `Err(AppError::MongoErr(_))` - Query failed
    pub async fn find(&self, guild_id: &str) -> Result<Option<GuildConfig>, AppError> {
        Ok(self.collection.find_one(guild_filter(guild_id)).await?)
    }

    /// Finds the configs of every listed guild in one query.
    ///
    /// Guilds without a config are simply absent from the result.
    pub async fn find_many(&self, guild_ids: &[String]) -> Result<Vec<GuildConfig>, AppError> {
        if guild_ids.is_empty() {
            return Ok(Vec::new());
        }

        let configs = self
            .collection
            .find(doc! { "guildId": { "$in": guild_ids } })
            .await?
            .try_collect()
            .await?;

        Ok(configs)
    }

    /// Applies a settings update under the `settings.` prefix.
    ///
    /// An empty update performs no database call.
    ///
    /// # Returns
    /// - `Ok(())` - Update applied, or nothing to apply
    /// - `Err(AppError::MongoErr(_))` - Update failed
    pub async fn update_settings(
        &self,
        guild_id: &str,
        update: &SettingsUpdate,
    ) -> Result<(), AppError> {
        let Some(update) = update.to_document() else {
            return Ok(());
        };

        self.collection
            .update_one(guild_filter(guild_id), update)
            .await?;

        Ok(())
    }

    /// Replaces the guild's whole events list.
    pub async fn update_events(
        &self,
        guild_id: &str,
        events: &[GuildEvent],
    ) -> Result<(), AppError> {
        self.collection
            .update_one(guild_filter(guild_id), events_update(events)?)
            .await?;

        Ok(())
    }
}

fn guild_filter(guild_id: &str) -> Document {
    doc! { "guildId": guild_id }
}

fn events_update(events: &[GuildEvent]) -> Result<Document, AppError> {
    let events = mongodb::bson::to_bson(events)?;
    Ok(doc! { "$set": { "events": events } })
}
