use serde::Serialize;

/// A guild role narrowed to what the config view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    pub id: String,
    pub name: String,
}

impl RoleSummary {
    /// Converts a serenity role fetched with the bot token.
    pub fn from_serenity(role: &serenity::all::Role) -> Self {
        Self {
            id: role.id.get().to_string(),
            name: role.name.clone(),
        }
    }
}
