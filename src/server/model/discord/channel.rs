use serde::Serialize;

/// A guild channel narrowed to what the config view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
}

impl ChannelSummary {
    /// Converts a serenity channel fetched with the bot token.
    pub fn from_serenity(channel: &serenity::all::GuildChannel) -> Self {
        Self {
            id: channel.id.get().to_string(),
            name: channel.name.clone(),
        }
    }
}
