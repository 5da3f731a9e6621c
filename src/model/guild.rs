use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct GuildDto {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
}

/// Entry of the guild picker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct AccessibleGuildDto {
    #[serde(flatten)]
    pub guild: GuildDto,
    /// Whether the bot already stores a config for the guild.
    pub configured: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuildViewDto {
    pub guild: GuildDto,
    pub configured: bool,
    /// Stored overrides only; absent keys use the default.
    pub settings: Option<GuildSettingsDto>,
    /// Stored override or default, per defaultable setting.
    pub effective_settings: BTreeMap<String, serde_json::Value>,
    pub events: Vec<GuildEventDto>,
    pub roles: BTreeMap<String, String>,
    pub channels: BTreeMap<String, String>,
    pub unit_names: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuildSettingsDto {
    pub admin_role: Vec<String>,
    pub timezone: Option<String>,
    pub language: Option<String>,
    pub swgoh_language: Option<String>,
    pub use_event_pages: Option<bool>,
    pub shardtime_vertical: Option<bool>,
    pub announce_chan: Option<String>,
    pub event_countdown: Option<Vec<i64>>,
    pub enable_welcome: Option<bool>,
    pub welcome_message: Option<String>,
    pub enable_part: Option<bool>,
    pub part_message: Option<String>,
    pub tw_list: TwListDto,
    pub aliases: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TwListDto {
    pub light: Vec<String>,
    pub dark: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuildEventDto {
    pub name: String,
    #[serde(rename = "eventDT")]
    pub event_dt: Option<i64>,
    pub message: Option<String>,
    pub channel: Option<String>,
    pub countdown: bool,
    pub repeat: Option<EventRepeatDto>,
    pub repeat_days: Vec<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRepeatDto {
    pub repeat_day: i64,
    pub repeat_hour: i64,
    pub repeat_min: i64,
}

/// Response to a settings save: which keys were stored and which reset to default.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct SettingsSavedDto {
    pub set: Vec<String>,
    pub unset: Vec<String>,
}
