//! Guild configuration documents from the bot's `guildConfigs` collection.
//!
//! The bot owns these documents; the website reads them and applies partial updates.
//! Every settings field is optional because a missing field means "use the default".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    model::guild::{EventRepeatDto, GuildEventDto, GuildSettingsDto, TwListDto},
    server::{
        model::settings::{DefaultSettings, SettingKey, SettingValue},
        util::number::{lenient_opt_i64, lenient_opt_i64_vec},
    },
};

/// One guild's stored configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildConfig {
    pub guild_id: String,
    #[serde(default)]
    pub settings: GuildSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<GuildEvent>>,
}

/// Stored per-guild overrides. `None` means the bot's default applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swgoh_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_event_pages: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shardtime_vertical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announce_chan: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64_vec",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_countdown: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_welcome: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_part: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tw_list: Option<TwList>,
    /// Alias name to unit base id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<BTreeMap<String, String>>,
}

/// Territory war unit lists, by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<Vec<String>>,
}

/// A scheduled guild event announced by the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildEvent {
    pub name: String,
    /// Event time in epoch milliseconds.
    #[serde(
        rename = "eventDT",
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_dt: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countdown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<EventRepeat>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64_vec",
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_days: Option<Vec<i64>>,
}

/// Fixed repeat interval of an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRepeat {
    #[serde(default, deserialize_with = "crate::server::util::number::lenient_i64")]
    pub repeat_day: i64,
    #[serde(default, deserialize_with = "crate::server::util::number::lenient_i64")]
    pub repeat_hour: i64,
    #[serde(default, deserialize_with = "crate::server::util::number::lenient_i64")]
    pub repeat_min: i64,
}

impl GuildSettings {
    /// The admin-role allow-list, empty when none is stored.
    pub fn admin_roles(&self) -> &[String] {
        self.admin_role.as_deref().unwrap_or_default()
    }

    /// The stored override for a defaultable setting, if any.
    pub fn value_of(&self, key: SettingKey) -> Option<SettingValue> {
        match key {
            SettingKey::Timezone => self.timezone.clone().map(SettingValue::Text),
            SettingKey::Language => self.language.clone().map(SettingValue::Text),
            SettingKey::SwgohLanguage => self.swgoh_language.clone().map(SettingValue::Text),
            SettingKey::UseEventPages => self.use_event_pages.map(SettingValue::Flag),
            SettingKey::ShardtimeVertical => self.shardtime_vertical.map(SettingValue::Flag),
            SettingKey::EventCountdown => self.event_countdown.clone().map(SettingValue::Numbers),
            SettingKey::EnableWelcome => self.enable_welcome.map(SettingValue::Flag),
            SettingKey::EnablePart => self.enable_part.map(SettingValue::Flag),
            SettingKey::AnnounceChan => self.announce_chan.clone().map(SettingValue::Text),
        }
    }

    /// Stored override or default for every defaultable setting, keyed by storage name.
    pub fn effective(&self, defaults: &DefaultSettings) -> BTreeMap<&'static str, SettingValue> {
        defaults
            .iter()
            .map(|(key, default)| {
                let value = self.value_of(key).unwrap_or_else(|| default.clone());
                (key.as_str(), value)
            })
            .collect()
    }

    /// Unit base ids referenced by the TW lists and aliases, without duplicates.
    pub fn referenced_unit_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let tw_list = self.tw_list.as_ref();
        let light = tw_list.and_then(|list| list.light.as_deref()).unwrap_or_default();
        let dark = tw_list.and_then(|list| list.dark.as_deref()).unwrap_or_default();
        let aliases = self.aliases.iter().flat_map(|aliases| aliases.values());

        for id in light.iter().chain(dark).chain(aliases) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

impl GuildSettings {
    pub fn into_dto(self) -> GuildSettingsDto {
        let tw_list = self.tw_list.unwrap_or_default();
        GuildSettingsDto {
            admin_role: self.admin_role.unwrap_or_default(),
            timezone: self.timezone,
            language: self.language,
            swgoh_language: self.swgoh_language,
            use_event_pages: self.use_event_pages,
            shardtime_vertical: self.shardtime_vertical,
            announce_chan: self.announce_chan,
            event_countdown: self.event_countdown,
            enable_welcome: self.enable_welcome,
            welcome_message: self.welcome_message,
            enable_part: self.enable_part,
            part_message: self.part_message,
            tw_list: TwListDto {
                light: tw_list.light.unwrap_or_default(),
                dark: tw_list.dark.unwrap_or_default(),
            },
            aliases: self.aliases.unwrap_or_default(),
        }
    }
}

impl GuildEvent {
    pub fn into_dto(self) -> GuildEventDto {
        GuildEventDto {
            name: self.name,
            event_dt: self.event_dt,
            message: self.message,
            channel: self.channel,
            countdown: self.countdown.unwrap_or(false),
            repeat: self.repeat.map(|repeat| EventRepeatDto {
                repeat_day: repeat.repeat_day,
                repeat_hour: repeat.repeat_hour,
                repeat_min: repeat.repeat_min,
            }),
            repeat_days: self.repeat_days.unwrap_or_default(),
        }
    }
}

impl GuildConfig {
    /// Inserts `event`, replacing any existing event with the same name.
    pub fn upsert_event(&mut self, event: GuildEvent) {
        let events = self.events.get_or_insert_with(Vec::new);
        match events.iter_mut().find(|existing| existing.name == event.name) {
            Some(existing) => *existing = event,
            None => events.push(event),
        }
    }

    /// Removes the event named `name`. Returns whether one was removed.
    pub fn remove_event(&mut self, name: &str) -> bool {
        let Some(events) = self.events.as_mut() else {
            return false;
        };
        let before = events.len();
        events.retain(|event| event.name != name);
        events.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};
    use pretty_assertions::assert_eq;

    fn event(name: &str, message: &str) -> GuildEvent {
        GuildEvent {
            name: name.to_string(),
            event_dt: Some(1_900_000_000_000),
            message: Some(message.to_string()),
            channel: None,
            countdown: None,
            repeat: None,
            repeat_days: None,
        }
    }

    #[test]
    fn reads_bot_written_document() {
        let config: GuildConfig = from_document(doc! {
            "_id": "abc",
            "guildId": "100000000000000001",
            "settings": {
                "adminRole": ["200000000000000001"],
                "eventCountdown": [30, 5],
                "twList": { "light": ["REYJEDITRAINING"] },
                "aliases": { "jkr": "JEDIKNIGHTREVAN" },
            },
            "events": [{
                "name": "raid",
                "eventDT": 1_700_000_000_000.0_f64,
                "repeat": { "repeatDay": 1, "repeatHour": 0, "repeatMin": 0 },
                "countdown": null,
            }],
        })
        .unwrap();

        assert_eq!(config.settings.admin_roles(), ["200000000000000001".to_string()]);
        assert_eq!(config.settings.event_countdown, Some(vec![30, 5]));
        let events = config.events.unwrap();
        assert_eq!(events[0].event_dt, Some(1_700_000_000_000));
        assert_eq!(events[0].countdown, None);
        assert_eq!(events[0].repeat.as_ref().unwrap().repeat_day, 1);
    }

    #[test]
    fn effective_settings_fall_back_to_defaults() {
        let settings = GuildSettings {
            timezone: Some("Europe/London".to_string()),
            ..Default::default()
        };

        let effective = settings.effective(&DefaultSettings::bot_defaults());

        assert_eq!(
            effective["timezone"],
            SettingValue::Text("Europe/London".to_string())
        );
        assert_eq!(effective["eventCountdown"], SettingValue::Numbers(vec![24, 2, 1]));
        assert_eq!(effective.len(), SettingKey::ALL.len());
    }

    #[test]
    fn referenced_unit_ids_are_deduplicated() {
        let settings = GuildSettings {
            tw_list: Some(TwList {
                light: Some(vec!["GLREY".to_string(), "JEDIKNIGHTREVAN".to_string()]),
                dark: Some(vec!["SITHPALPATINE".to_string()]),
            }),
            aliases: Some(BTreeMap::from([(
                "jkr".to_string(),
                "JEDIKNIGHTREVAN".to_string(),
            )])),
            ..Default::default()
        };

        assert_eq!(
            settings.referenced_unit_ids(),
            vec!["GLREY", "JEDIKNIGHTREVAN", "SITHPALPATINE"]
        );
    }

    #[test]
    fn upsert_event_replaces_by_name() {
        let mut config = GuildConfig {
            guild_id: "1".to_string(),
            settings: GuildSettings::default(),
            events: None,
        };

        config.upsert_event(event("raid", "first"));
        config.upsert_event(event("tw", "other"));
        config.upsert_event(event("raid", "second"));

        let events = config.events.as_ref().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message.as_deref(), Some("second"));
    }

    #[test]
    fn remove_event_reports_missing_name() {
        let mut config = GuildConfig {
            guild_id: "1".to_string(),
            settings: GuildSettings::default(),
            events: Some(vec![event("raid", "x")]),
        };

        assert!(!config.remove_event("tw"));
        assert!(config.remove_event("raid"));
        assert_eq!(config.events, Some(vec![]));
    }
}
