use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use mongodb::bson::Bson;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::server::{
    error::AppError,
    model::{
        form::{FormErrors, LANGUAGES, MAX_MESSAGE_LENGTH, SWGOH_LANGUAGES},
        guild::{EventRepeat, GuildEvent},
        settings::{SettingKey, SettingValue, SettingsPatch, SettingsUpdate},
    },
};

const EVENT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const MAX_EVENT_NAME_LENGTH: usize = 100;

/// Guild settings as submitted from the config page.
///
/// An omitted field leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuildSettingsForm {
    pub language: Option<String>,
    pub swgoh_language: Option<String>,
    pub timezone: Option<String>,
    pub use_event_pages: Option<bool>,
    pub shardtime_vertical: Option<bool>,
    pub announce_chan: Option<String>,
    pub admin_role: Option<Vec<String>>,
    /// Comma-separated minutes, e.g. `"24,2,1"`.
    pub event_countdown: Option<String>,
    pub enable_welcome: Option<bool>,
    pub welcome_message: Option<String>,
    pub enable_part: Option<bool>,
    pub part_message: Option<String>,
}

/// A checked settings form split into defaultable and pass-through values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedGuildSettings {
    /// Values for settings that have a default, to be reconciled.
    pub patch: SettingsPatch,
    pub admin_role: Option<Vec<String>>,
    pub welcome_message: Option<String>,
    pub part_message: Option<String>,
}

impl GuildSettingsForm {
    /// Checks every field and builds the typed patch.
    ///
    /// # Returns
    /// - `Ok(ValidatedGuildSettings)` - All submitted fields are valid
    /// - `Err(AppError::BadRequest)` - One or more fields are invalid; the message lists all of them
    pub fn validate(self) -> Result<ValidatedGuildSettings, AppError> {
        let mut errors = FormErrors::new();

        errors.check_one_of("language", self.language.as_deref(), LANGUAGES);
        errors.check_one_of(
            "swgohLanguage",
            self.swgoh_language.as_deref(),
            SWGOH_LANGUAGES,
        );
        if let Some(timezone) = &self.timezone {
            if timezone.parse::<Tz>().is_err() {
                errors.push(format!("Invalid timezone: {}", timezone));
            }
        }
        if let Some(channel) = self.announce_chan.as_deref().filter(|c| !c.is_empty()) {
            errors.check_snowflake("announceChan", Some(channel));
        }
        for role in self.admin_role.iter().flatten() {
            errors.check_snowflake("adminRole", Some(role.as_str()));
        }
        let event_countdown = errors.parse_positive_list(self.event_countdown.as_deref());
        errors.check_max_length(
            "welcomeMessage",
            self.welcome_message.as_deref(),
            MAX_MESSAGE_LENGTH,
        );
        errors.check_max_length(
            "partMessage",
            self.part_message.as_deref(),
            MAX_MESSAGE_LENGTH,
        );
        errors.into_result()?;

        let mut patch = SettingsPatch::new();
        let text = [
            (SettingKey::Timezone, self.timezone),
            (SettingKey::Language, self.language),
            (SettingKey::SwgohLanguage, self.swgoh_language),
            (SettingKey::AnnounceChan, self.announce_chan),
        ];
        for (key, value) in text {
            if let Some(value) = value {
                patch.insert(key, SettingValue::Text(value))?;
            }
        }
        let flags = [
            (SettingKey::UseEventPages, self.use_event_pages),
            (SettingKey::ShardtimeVertical, self.shardtime_vertical),
            (SettingKey::EnableWelcome, self.enable_welcome),
            (SettingKey::EnablePart, self.enable_part),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                patch.insert(key, SettingValue::Flag(value))?;
            }
        }
        if let Some(countdown) = event_countdown {
            patch.insert(SettingKey::EventCountdown, SettingValue::Numbers(countdown))?;
        }

        Ok(ValidatedGuildSettings {
            patch,
            admin_role: self.admin_role,
            welcome_message: self.welcome_message,
            part_message: self.part_message,
        })
    }
}

impl ValidatedGuildSettings {
    /// Adds the submitted pass-through values to `update` as plain sets.
    pub fn merge_pass_through(&self, update: &mut SettingsUpdate) {
        if let Some(roles) = &self.admin_role {
            let roles = roles.iter().cloned().map(Bson::String).collect();
            update.set("adminRole", Bson::Array(roles));
        }
        if let Some(message) = &self.welcome_message {
            update.set("welcomeMessage", Bson::String(message.clone()));
        }
        if let Some(message) = &self.part_message {
            update.set("partMessage", Bson::String(message.clone()));
        }
    }
}

/// A guild event as submitted from the event editor.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuildEventForm {
    pub name: String,
    /// `YYYY-MM-DDTHH:MM` in UTC.
    #[serde(rename = "eventDT")]
    pub event_dt: Option<String>,
    pub channel: Option<String>,
    /// Checkbox value; `"on"`, `"true"` and `"yes"` enable the countdown.
    pub countdown: Option<String>,
    pub message: Option<String>,
    pub repeat_day: Option<i64>,
    pub repeat_hour: Option<i64>,
    pub repeat_min: Option<i64>,
    /// Comma-separated day counts between repeats.
    pub repeat_days: Option<String>,
}

impl GuildEventForm {
    /// Checks the form against `now` and builds the stored event.
    pub fn validate(self, now: DateTime<Utc>) -> Result<GuildEvent, AppError> {
        let mut errors = FormErrors::new();

        let name_length = self.name.chars().count();
        if name_length == 0 || name_length > MAX_EVENT_NAME_LENGTH {
            errors.push(format!(
                "name must be between 1 and {} characters",
                MAX_EVENT_NAME_LENGTH
            ));
        }
        errors.check_max_length("message", self.message.as_deref(), MAX_MESSAGE_LENGTH);
        errors.check_snowflake("channel", self.channel.as_deref());

        let interval = [self.repeat_day, self.repeat_hour, self.repeat_min];
        if interval.iter().flatten().any(|value| *value < 0) {
            errors.push("Repeat interval values must not be negative.");
        }
        let has_interval = interval.iter().flatten().any(|value| *value != 0);
        let repeat_days = self
            .repeat_days
            .as_deref()
            .map(str::trim)
            .filter(|days| !days.is_empty());
        if has_interval && repeat_days.is_some() {
            errors.push(
                "Cannot set both Repeat Interval and Repeat Days. Use only one repeat type.",
            );
        }
        let repeat_days = errors.parse_positive_list(repeat_days);

        let event_dt = match self.event_dt.as_deref().filter(|dt| !dt.is_empty()) {
            None => None,
            Some(raw) => match NaiveDateTime::parse_from_str(raw, EVENT_DATE_FORMAT) {
                Ok(parsed) => {
                    let at = parsed.and_utc();
                    if at <= now {
                        errors.push("Event date and time must be in the future.");
                    }
                    Some(at.timestamp_millis())
                }
                Err(_) => {
                    errors.push("Event date must be formatted as YYYY-MM-DDTHH:MM.");
                    None
                }
            },
        };

        errors.into_result()?;

        let repeat = has_interval.then(|| EventRepeat {
            repeat_day: self.repeat_day.unwrap_or(0),
            repeat_hour: self.repeat_hour.unwrap_or(0),
            repeat_min: self.repeat_min.unwrap_or(0),
        });
        let countdown = self
            .countdown
            .map(|value| matches!(value.as_str(), "on" | "true" | "yes"));

        Ok(GuildEvent {
            name: self.name,
            event_dt,
            message: self.message,
            channel: self.channel,
            countdown,
            repeat,
            repeat_days,
        })
    }
}
