//! Repository for the bot's `users` collection.

use mongodb::{
    bson::{doc, Document},
    Collection, Database,
};

use crate::server::{
    error::AppError,
    model::user::{UserConfig, UserConfigUpdate},
};

pub const USERS_COLLECTION: &str = "users";

/// Repository providing operations on per-user bot configuration.
///
/// User documents are created by the bot; updates from the dashboard never upsert.
pub struct UserConfigRepository {
    collection: Collection<UserConfig>,
}

impl UserConfigRepository {
    /// Creates a new UserConfigRepository instance.
    ///
    /// # Arguments
    /// - `db` - The bot's database
    ///
    /// # Returns
    /// - `UserConfigRepository` - New repository instance
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }

    /// Finds a user's config by Discord user ID.
    ///
    /// # Returns
    /// - `Ok(Some(UserConfig))` - The stored config
    /// - `Ok(None)` - The user never registered with the bot
    /// - `Err(AppError::MongoErr(_))` - Query failed
    pub async fn find(&self, user_id: &str) -> Result<Option<UserConfig>, AppError> {
        Ok(self.collection.find_one(user_filter(user_id)).await?)
    }

    /// Applies a dotted `$set` to one section of the user's config.
    ///
    /// # Returns
    /// - `Ok(())` - Update applied, or the update was empty
    /// - `Err(AppError::NotFound(_))` - No config exists for this user
    /// - `Err(AppError::MongoErr(_))` - Update failed
    pub async fn update(&self, user_id: &str, update: &UserConfigUpdate) -> Result<(), AppError> {
        let Some(update) = update.to_document() else {
            return Ok(());
        };

        let result = self
            .collection
            .update_one(user_filter(user_id), update)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User config not found".to_string()));
        }

        Ok(())
    }
}

fn user_filter(user_id: &str) -> Document {
    doc! { "id": user_id }
}
