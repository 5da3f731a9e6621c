//! Factory for `/users/@me/guilds` entries.

use serde_json::{json, Value};

use crate::factory::helpers::next_snowflake;

/// MANAGE_GUILD permission bit as Discord encodes it.
pub const MANAGE_GUILD: &str = "32";

/// A permission set without MANAGE_GUILD (view channels, send messages, read history).
pub const MEMBER: &str = "68608";

/// Builder for a partial guild as returned by the current-user guild list.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::guild::GuildFactory;
///
/// let guild = GuildFactory::new()
///     .id("123456789012345678")
///     .name("CustomGuild")
///     .permissions("2147483647")
///     .build();
/// ```
pub struct GuildFactory {
    id: String,
    name: String,
    icon: Option<String>,
    permissions: String,
}

impl GuildFactory {
    /// Creates a new GuildFactory with default values.
    ///
    /// Defaults:
    /// - id: unique 18-digit snowflake
    /// - name: `"Guild {id}"`
    /// - icon: `None`
    /// - permissions: [`MEMBER`]
    pub fn new() -> Self {
        let id = next_snowflake();
        Self {
            name: format!("Guild {}", id),
            id,
            icon: None,
            permissions: MEMBER.to_string(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the decimal-string permission bitmask.
    pub fn permissions(mut self, permissions: impl Into<String>) -> Self {
        self.permissions = permissions.into();
        self
    }

    /// Builds the JSON payload.
    pub fn build(self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "icon": self.icon,
            "owner": false,
            "permissions": self.permissions,
            "features": [],
        })
    }
}

impl Default for GuildFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a guild entry with default values.
pub fn create_guild() -> Value {
    GuildFactory::new().build()
}
