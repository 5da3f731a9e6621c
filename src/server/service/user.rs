//! User service for the personal dashboard.
//!
//! This module provides the `UserService` for reading a user's bot configuration and
//! applying validated section updates to it.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::server::{
    data::user_config::UserConfigRepository,
    error::AppError,
    model::{
        form::user::{ArenaAlertForm, ArenaWatchForm, GuildTicketsForm, GuildUpdateForm, LangForm},
        user::{UserConfigSection, UserConfigUpdate, UserDashboard},
    },
    service::payout::format_payout_times,
};

/// Service providing business logic for the user dashboard.
pub struct UserService<'a> {
    pub db: &'a mongodb::Database,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the bot's database
    ///
    /// # Returns
    /// - `UserService` - New service instance
    pub fn new(db: &'a mongodb::Database) -> Self {
        Self { db }
    }

    /// Loads the user's dashboard.
    ///
    /// Accounts and watched accounts are sorted by name ignoring case, and each
    /// watched account with a payout offset gets its payout countdowns.
    ///
    /// # Arguments
    /// - `user_id` - Discord ID of the logged-in user
    /// - `now` - Current time for the payout countdowns
    ///
    /// # Returns
    /// - `Ok(Some(UserDashboard))` - The user's dashboard
    /// - `Ok(None)` - The user never registered with the bot
    /// - `Err(AppError::MongoErr(_))` - Query failed
    pub async fn dashboard(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserDashboard>, AppError> {
        let config = UserConfigRepository::new(self.db).find(user_id).await?;

        Ok(config.map(|mut config| {
            config.sort_by_name();
            let watch_payouts = config
                .arena_watch
                .allycodes
                .iter()
                .map(|account| account.po_offset.map(|offset| format_payout_times(offset, now)))
                .collect();

            UserDashboard {
                config,
                watch_payouts,
            }
        }))
    }

    /// Validates a section form and applies it to the user's config.
    ///
    /// # Arguments
    /// - `user_id` - Discord ID of the logged-in user
    /// - `section` - Which part of the config the form edits
    /// - `body` - The submitted JSON form
    ///
    /// # Returns
    /// - `Ok(())` - Update applied
    /// - `Err(AppError::BadRequest(_))` - Malformed or invalid form
    /// - `Err(AppError::NotFound(_))` - No config exists for this user
    pub async fn update(
        &self,
        user_id: &str,
        section: UserConfigSection,
        body: Value,
    ) -> Result<(), AppError> {
        let update = section_update(section, body)?;

        UserConfigRepository::new(self.db)
            .update(user_id, &update)
            .await?;

        tracing::info!(
            "User {} updated dashboard section {}",
            user_id,
            section.field()
        );

        Ok(())
    }
}

/// Parses and validates the form for one section.
fn section_update(section: UserConfigSection, body: Value) -> Result<UserConfigUpdate, AppError> {
    match section {
        UserConfigSection::Lang => parse_form::<LangForm>(body)?.validate(),
        UserConfigSection::ArenaAlert => parse_form::<ArenaAlertForm>(body)?.validate(),
        UserConfigSection::ArenaWatch => parse_form::<ArenaWatchForm>(body)?.validate(),
        UserConfigSection::GuildUpdate => parse_form::<GuildUpdateForm>(body)?.validate(),
        UserConfigSection::GuildTickets => parse_form::<GuildTicketsForm>(body)?.validate(),
    }
}

fn parse_form<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("Invalid form: {}", e)))
}
