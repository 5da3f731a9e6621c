use std::collections::BTreeMap;

use crate::{
    model::guild::{AccessibleGuildDto, GuildViewDto},
    server::model::{discord::GuildSummary, guild::GuildConfig, settings::SettingValue},
};

/// A guild the user may open, with its stored config when the bot has one.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessibleGuild {
    pub guild: GuildSummary,
    pub config: Option<GuildConfig>,
}

/// Everything the guild config page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildView {
    pub guild: GuildSummary,
    pub config: Option<GuildConfig>,
    /// Stored override or default per defaultable setting.
    pub effective_settings: BTreeMap<&'static str, SettingValue>,
    /// Role id to name.
    pub roles: BTreeMap<String, String>,
    /// Channel id to name.
    pub channels: BTreeMap<String, String>,
    /// Unit base id to display name.
    pub unit_names: BTreeMap<String, String>,
}

impl AccessibleGuild {
    pub fn into_dto(self) -> AccessibleGuildDto {
        AccessibleGuildDto {
            configured: self.config.is_some(),
            guild: self.guild.into_dto(),
        }
    }
}

impl GuildView {
    pub fn into_dto(self) -> GuildViewDto {
        let configured = self.config.is_some();
        let (settings, events) = match self.config {
            Some(config) => (
                Some(config.settings.into_dto()),
                config
                    .events
                    .unwrap_or_default()
                    .into_iter()
                    .map(|event| event.into_dto())
                    .collect(),
            ),
            None => (None, Vec::new()),
        };

        GuildViewDto {
            guild: self.guild.into_dto(),
            configured,
            settings,
            effective_settings: self
                .effective_settings
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_json()))
                .collect(),
            events,
            roles: self.roles,
            channels: self.channels,
            unit_names: self.unit_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::guild::{GuildEvent, GuildSettings};
    use serde_json::json;

    fn summary() -> GuildSummary {
        GuildSummary {
            id: "100000000000000001".to_string(),
            name: "Rebels".to_string(),
            icon: None,
            permissions: "32".to_string(),
        }
    }

    #[test]
    fn unconfigured_guild_has_no_settings() {
        let dto = AccessibleGuild {
            guild: summary(),
            config: None,
        }
        .into_dto();

        assert!(!dto.configured);
        assert_eq!(dto.guild.name, "Rebels");
    }

    #[test]
    fn view_dto_flattens_config() {
        let view = GuildView {
            guild: summary(),
            config: Some(GuildConfig {
                guild_id: "100000000000000001".to_string(),
                settings: GuildSettings {
                    admin_role: Some(vec!["200000000000000001".to_string()]),
                    ..Default::default()
                },
                events: Some(vec![GuildEvent {
                    name: "raid".to_string(),
                    event_dt: Some(1_900_000_000_000),
                    message: None,
                    channel: None,
                    countdown: None,
                    repeat: None,
                    repeat_days: None,
                }]),
            }),
            effective_settings: BTreeMap::from([(
                "eventCountdown",
                SettingValue::Numbers(vec![24, 2, 1]),
            )]),
            roles: BTreeMap::new(),
            channels: BTreeMap::new(),
            unit_names: BTreeMap::new(),
        };

        let dto = view.into_dto();

        assert!(dto.configured);
        assert_eq!(
            dto.settings.unwrap().admin_role,
            vec!["200000000000000001".to_string()]
        );
        assert_eq!(dto.events.len(), 1);
        assert!(!dto.events[0].countdown);
        assert_eq!(dto.effective_settings["eventCountdown"], json!([24, 2, 1]));
    }
}
