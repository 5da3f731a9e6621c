//! Defaultable guild settings.
//!
//! Every setting the bot ships a default for is listed once in [`SETTING_TABLE`] with
//! its storage name and value kind. The kind decides how a submitted value is compared
//! against the default: flags and text by plain equality, number lists element-wise.

use std::collections::BTreeMap;

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::server::error::internal::InternalError;

/// Prefix under which guild settings live in a `guildConfigs` document.
const SETTINGS_PREFIX: &str = "settings";

/// Shape of a setting's value, which also fixes its comparison rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    /// Boolean, compared by equality.
    Flag,
    /// String, compared by equality.
    Text,
    /// Ordered list of integers, compared element-wise.
    Numbers,
}

impl SettingKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flag => "boolean",
            Self::Text => "text",
            Self::Numbers => "number list",
        }
    }
}

/// Settings that have a bot-wide default.
///
/// Declaration order is table order: diffs list keys in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    Timezone,
    Language,
    SwgohLanguage,
    UseEventPages,
    ShardtimeVertical,
    EventCountdown,
    EnableWelcome,
    EnablePart,
    AnnounceChan,
}

/// One row of the settings table.
pub struct SettingDefinition {
    /// Field name inside the stored `settings` sub-document.
    pub name: &'static str,
    pub kind: SettingKind,
}

/// Every defaultable setting, indexed by `SettingKey` discriminant.
pub const SETTING_TABLE: [SettingDefinition; 9] = [
    SettingDefinition {
        name: "timezone",
        kind: SettingKind::Text,
    },
    SettingDefinition {
        name: "language",
        kind: SettingKind::Text,
    },
    SettingDefinition {
        name: "swgohLanguage",
        kind: SettingKind::Text,
    },
    SettingDefinition {
        name: "useEventPages",
        kind: SettingKind::Flag,
    },
    SettingDefinition {
        name: "shardtimeVertical",
        kind: SettingKind::Flag,
    },
    SettingDefinition {
        name: "eventCountdown",
        kind: SettingKind::Numbers,
    },
    SettingDefinition {
        name: "enableWelcome",
        kind: SettingKind::Flag,
    },
    SettingDefinition {
        name: "enablePart",
        kind: SettingKind::Flag,
    },
    SettingDefinition {
        name: "announceChan",
        kind: SettingKind::Text,
    },
];

impl SettingKey {
    #[cfg(test)]
    pub const ALL: [SettingKey; 9] = [
        Self::Timezone,
        Self::Language,
        Self::SwgohLanguage,
        Self::UseEventPages,
        Self::ShardtimeVertical,
        Self::EventCountdown,
        Self::EnableWelcome,
        Self::EnablePart,
        Self::AnnounceChan,
    ];

    pub fn definition(&self) -> &'static SettingDefinition {
        &SETTING_TABLE[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        self.definition().name
    }

    pub fn kind(&self) -> SettingKind {
        self.definition().kind
    }

    #[cfg(test)]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

/// A setting value of one of the three supported kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Flag(bool),
    Text(String),
    Numbers(Vec<i64>),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            Self::Flag(_) => SettingKind::Flag,
            Self::Text(_) => SettingKind::Text,
            Self::Numbers(_) => SettingKind::Numbers,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Flag(value) => serde_json::Value::Bool(*value),
            Self::Text(value) => serde_json::Value::String(value.clone()),
            Self::Numbers(values) => serde_json::Value::from(values.clone()),
        }
    }

    /// Converts to BSON, storing small integers as Int32 like the bot does.
    pub fn to_bson(&self) -> Bson {
        match self {
            Self::Flag(value) => Bson::Boolean(*value),
            Self::Text(value) => Bson::String(value.clone()),
            Self::Numbers(values) => Bson::Array(
                values
                    .iter()
                    .map(|value| match i32::try_from(*value) {
                        Ok(small) => Bson::Int32(small),
                        Err(_) => Bson::Int64(*value),
                    })
                    .collect(),
            ),
        }
    }
}

fn check_kind(key: SettingKey, value: &SettingValue) -> Result<(), InternalError> {
    if value.kind() == key.kind() {
        Ok(())
    } else {
        Err(InternalError::SettingKindMismatch {
            key: key.as_str(),
            expected: key.kind().name(),
        })
    }
}

/// The bot's default value per setting. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultSettings {
    values: BTreeMap<SettingKey, SettingValue>,
}

impl DefaultSettings {
    /// The defaults the bot applies to a guild with no stored override.
    pub fn bot_defaults() -> Self {
        let values = [
            (
                SettingKey::Timezone,
                SettingValue::Text("America/New_York".to_string()),
            ),
            (SettingKey::Language, SettingValue::Text("en_US".to_string())),
            (
                SettingKey::SwgohLanguage,
                SettingValue::Text("ENG_US".to_string()),
            ),
            (SettingKey::UseEventPages, SettingValue::Flag(false)),
            (SettingKey::ShardtimeVertical, SettingValue::Flag(false)),
            (
                SettingKey::EventCountdown,
                SettingValue::Numbers(vec![24, 2, 1]),
            ),
            (SettingKey::EnableWelcome, SettingValue::Flag(false)),
            (SettingKey::EnablePart, SettingValue::Flag(false)),
            (SettingKey::AnnounceChan, SettingValue::Text(String::new())),
        ];

        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Builds a table from explicit values, checking each against its key's kind.
    ///
    /// Keys left out have no default and are ignored by the reconciler.
    #[cfg(test)]
    pub fn from_values(
        values: impl IntoIterator<Item = (SettingKey, SettingValue)>,
    ) -> Result<Self, InternalError> {
        let mut table = BTreeMap::new();
        for (key, value) in values {
            check_kind(key, &value)?;
            table.insert(key, value);
        }
        Ok(Self { values: table })
    }

    #[cfg(test)]
    pub fn get(&self, key: SettingKey) -> Option<&SettingValue> {
        self.values.get(&key)
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, &SettingValue)> {
        self.values.iter().map(|(key, value)| (*key, value))
    }
}

/// Proposed values for defaultable settings from one submission.
///
/// Values are kind-checked on insert, so a patch never holds a value of the wrong
/// shape for its key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    values: BTreeMap<SettingKey, SettingValue>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: SettingKey, value: SettingValue) -> Result<(), InternalError> {
        check_kind(key, &value)?;
        self.values.insert(key, value);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    #[cfg(test)]
    pub fn with(mut self, key: SettingKey, value: SettingValue) -> Result<Self, InternalError> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: SettingKey) -> Option<&SettingValue> {
        self.values.get(&key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of reconciling a patch against the defaults.
///
/// A key appears in at most one of `set` and `unset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsDiff {
    /// Keys whose proposed value differs from the default.
    pub set: BTreeMap<SettingKey, SettingValue>,
    /// Keys whose proposed value equals the default, in table order.
    pub unset: Vec<SettingKey>,
}

impl SettingsDiff {
    /// Turns the diff into a storage update the caller can extend with
    /// keys that have no default.
    pub fn into_update(self) -> SettingsUpdate {
        let mut update = SettingsUpdate::new();
        for (key, value) in self.set {
            update.set(key.as_str(), value.to_bson());
        }
        for key in self.unset {
            update.unset(key.as_str());
        }
        update
    }
}

/// Partial update of a guild's `settings` sub-document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    set: Vec<(String, Bson)>,
    unset: Vec<String>,
}

impl SettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any earlier set or unset of the same key.
    pub fn set(&mut self, key: impl Into<String>, value: Bson) {
        let key = key.into();
        self.unset.retain(|existing| existing != &key);
        match self.set.iter_mut().find(|(existing, _)| existing == &key) {
            Some(entry) => entry.1 = value,
            None => self.set.push((key, value)),
        }
    }

    /// Removes `key` from storage, replacing any earlier set of the same key.
    pub fn unset(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.set.retain(|(existing, _)| existing != &key);
        if !self.unset.contains(&key) {
            self.unset.push(key);
        }
    }

    pub fn set_keys(&self) -> impl Iterator<Item = &str> {
        self.set.iter().map(|(key, _)| key.as_str())
    }

    pub fn unset_keys(&self) -> impl Iterator<Item = &str> {
        self.unset.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// Builds the MongoDB update document, or `None` when there is nothing to do.
    pub fn to_document(&self) -> Option<Document> {
        if self.is_empty() {
            return None;
        }

        let mut update = Document::new();
        if !self.set.is_empty() {
            let fields: Document = self
                .set
                .iter()
                .map(|(key, value)| (format!("{}.{}", SETTINGS_PREFIX, key), value.clone()))
                .collect();
            update.insert("$set", fields);
        }
        if !self.unset.is_empty() {
            let fields: Document = self
                .unset
                .iter()
                .map(|key| (format!("{}.{}", SETTINGS_PREFIX, key), Bson::Int32(1)))
                .collect();
            update.insert("$unset", fields);
        }

        Some(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use pretty_assertions::assert_eq;

    #[test]
    fn table_is_indexed_by_discriminant() {
        for (index, key) in SettingKey::ALL.into_iter().enumerate() {
            assert_eq!(key as usize, index);
            assert_eq!(SettingKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(SettingKey::from_name("adminRole"), None);
    }

    #[test]
    fn bot_defaults_cover_every_key_with_matching_kind() {
        let defaults = DefaultSettings::bot_defaults();
        for key in SettingKey::ALL {
            let value = defaults.get(key).unwrap();
            assert_eq!(value.kind(), key.kind(), "{}", key.as_str());
        }
    }

    #[test]
    fn patch_rejects_value_of_wrong_kind() {
        let mut patch = SettingsPatch::new();
        let result = patch.insert(SettingKey::EventCountdown, SettingValue::Text("24".into()));
        assert!(matches!(
            result,
            Err(InternalError::SettingKindMismatch {
                key: "eventCountdown",
                ..
            })
        ));
        assert!(patch.is_empty());
    }

    #[test]
    fn defaults_reject_value_of_wrong_kind() {
        let result =
            DefaultSettings::from_values([(SettingKey::UseEventPages, SettingValue::Text("no".into()))]);
        assert!(result.is_err());
    }

    #[test]
    fn update_document_prefixes_settings_keys() {
        let mut update = SettingsUpdate::new();
        update.set("timezone", Bson::String("Europe/Berlin".into()));
        update.unset("language");

        assert_eq!(
            update.to_document().unwrap(),
            doc! {
                "$set": { "settings.timezone": "Europe/Berlin" },
                "$unset": { "settings.language": 1 },
            }
        );
    }

    #[test]
    fn empty_update_has_no_document() {
        assert_eq!(SettingsUpdate::new().to_document(), None);
    }

    #[test]
    fn later_set_replaces_earlier_unset_of_same_key() {
        let mut update = SettingsUpdate::new();
        update.unset("adminRole");
        update.set("adminRole", Bson::Array(vec![]));

        assert_eq!(update.unset_keys().count(), 0);
        assert_eq!(update.set_keys().collect::<Vec<_>>(), vec!["adminRole"]);
    }

    #[test]
    fn number_lists_are_stored_as_int32() {
        let value = SettingValue::Numbers(vec![24, 2, 1]);
        assert_eq!(
            value.to_bson(),
            Bson::Array(vec![Bson::Int32(24), Bson::Int32(2), Bson::Int32(1)])
        );
    }
}
