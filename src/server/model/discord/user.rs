use serde::{Deserialize, Serialize};

/// The authenticated user as returned by `/users/@me`.
///
/// Stored in the session after login, so it round-trips through serde_json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordUser {
    /// User snowflake.
    pub id: String,
    pub username: String,
    /// Avatar hash, `None` for the default avatar.
    #[serde(default)]
    pub avatar: Option<String>,
}

impl DiscordUser {
    pub fn into_dto(self) -> crate::model::user::UserDto {
        crate::model::user::UserDto {
            id: self.id,
            username: self.username,
            avatar: self.avatar,
        }
    }
}
