use serde::{Deserialize, Serialize};
use serenity::all::Permissions;

use crate::server::util::parse::parse_permissions;

/// A guild from the user's `/users/@me/guilds` list.
///
/// Also the element type of the session's cached guild list, so it serializes back
/// to the same wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSummary {
    /// Guild snowflake.
    pub id: String,
    pub name: String,
    /// Icon hash, `None` when the guild has no icon.
    #[serde(default)]
    pub icon: Option<String>,
    /// The user's effective permissions in the guild as a decimal-string bitmask.
    pub permissions: String,
}

impl GuildSummary {
    /// Whether the user holds Manage Guild. An unparsable bitmask counts as no bits.
    pub fn can_manage(&self) -> bool {
        parse_permissions(&self.permissions)
            .map(|permissions| permissions.contains(Permissions::MANAGE_GUILD))
            .unwrap_or(false)
    }

    pub fn into_dto(self) -> crate::model::guild::GuildDto {
        crate::model::guild::GuildDto {
            id: self.id,
            name: self.name,
            icon: self.icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild(permissions: &str) -> GuildSummary {
        GuildSummary {
            id: "100000000000000001".to_string(),
            name: "Test".to_string(),
            icon: None,
            permissions: permissions.to_string(),
        }
    }

    #[test]
    fn manage_guild_bit_grants_manage() {
        assert!(guild("32").can_manage());
        assert!(guild("2147483647").can_manage());
        assert!(!guild("68608").can_manage());
    }

    #[test]
    fn garbage_permissions_never_manage() {
        assert!(!guild("").can_manage());
        assert!(!guild("0x20").can_manage());
    }

    #[test]
    fn deserializes_discord_payload_without_icon_field() {
        let guild: GuildSummary = serde_json::from_str(
            r#"{"id":"1","name":"Guild","permissions":"32","owner":false,"features":[]}"#,
        )
        .unwrap();
        assert_eq!(guild.icon, None);
        assert_eq!(guild.permissions, "32");
    }
}
