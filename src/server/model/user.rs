//! Per-user bot configuration from the bot's `users` collection.
//!
//! Every sub-document tolerates missing fields: users registered by older bot
//! versions have only some of them.

use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::{
    model::user::{
        AccountDto, ArenaAlertDto, ArenaWatchDto, DashboardDto, GuildTicketsDto, GuildUpdateDto,
        LangDto, PayoutTimesDto, WatchedAccountDto,
    },
    server::util::number::{lenient_opt_i64, lenient_string},
};

/// A user's stored bot configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Discord user snowflake.
    pub id: String,
    #[serde(default)]
    pub accounts: Vec<UserAccount>,
    #[serde(default)]
    pub lang: LangSettings,
    #[serde(default)]
    pub arena_alert: ArenaAlert,
    #[serde(default)]
    pub arena_watch: ArenaWatch,
    #[serde(default)]
    pub guild_update: GuildUpdate,
    #[serde(default)]
    pub guild_tickets: GuildTickets,
}

/// A game account linked to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(deserialize_with = "lenient_string")]
    pub ally_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_char_rank: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_ship_rank: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LangSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swgoh_language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaAlert {
    #[serde(
        rename = "enableRankDMs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enable_rank_dms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arena: Option<String>,
    /// Minutes before payout to send a warning.
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub payout_warning: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_payout_result: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaWatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub allycodes: Vec<ArenaWatchAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showvs: Option<bool>,
}

/// An account whose arena rank the bot reports on.
///
/// Older documents spell the ally code field `allycode`; both are kept as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaWatchAccount {
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub ally_code: Option<i64>,
    #[serde(
        rename = "allycode",
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_ally_code: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_char: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_ship: Option<i64>,
    /// Account UTC offset in minutes, used for payout times.
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub po_offset: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub allycode: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildTickets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_max: Option<bool>,
}

impl ArenaWatchAccount {
    /// The ally code under whichever spelling the document used.
    pub fn ally_code(&self) -> Option<i64> {
        self.ally_code.or(self.legacy_ally_code)
    }
}

impl UserConfig {
    /// Sorts linked accounts and watched accounts by name, ignoring case.
    pub fn sort_by_name(&mut self) {
        self.accounts
            .sort_by_cached_key(|account| account.name.to_lowercase());
        self.arena_watch
            .allycodes
            .sort_by_cached_key(|account| account.name.to_lowercase());
    }
}

/// Editable sections of a user config, named as they appear in request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserConfigSection {
    Lang,
    ArenaAlert,
    ArenaWatch,
    GuildUpdate,
    GuildTickets,
}

impl UserConfigSection {
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "lang" => Some(Self::Lang),
            "arena-alert" => Some(Self::ArenaAlert),
            "arena-watch" => Some(Self::ArenaWatch),
            "guild-update" => Some(Self::GuildUpdate),
            "guild-tickets" => Some(Self::GuildTickets),
            _ => None,
        }
    }

    /// Document field holding the section.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Lang => "lang",
            Self::ArenaAlert => "arenaAlert",
            Self::ArenaWatch => "arenaWatch",
            Self::GuildUpdate => "guildUpdate",
            Self::GuildTickets => "guildTickets",
        }
    }
}

/// Dotted-path `$set` update of one user config section.
#[derive(Debug, Clone, PartialEq)]
pub struct UserConfigUpdate {
    section: UserConfigSection,
    set: Vec<(&'static str, Bson)>,
}

impl UserConfigUpdate {
    pub fn new(section: UserConfigSection) -> Self {
        Self {
            section,
            set: Vec::new(),
        }
    }

    /// Sets `field` within the section.
    pub fn set(&mut self, field: &'static str, value: impl Into<Bson>) {
        self.set.push((field, value.into()));
    }

    /// Sets `field` only when a value was submitted.
    pub fn set_some<T: Into<Bson>>(&mut self, field: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.set(field, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Builds the MongoDB update document, or `None` when nothing was submitted.
    pub fn to_document(&self) -> Option<Document> {
        if self.is_empty() {
            return None;
        }

        let section = self.section.field();
        let fields: Document = self
            .set
            .iter()
            .map(|(field, value)| (format!("{}.{}", section, field), value.clone()))
            .collect();

        let mut update = Document::new();
        update.insert("$set", fields);
        Some(update)
    }
}

/// Countdowns to the next squad and fleet arena payouts, formatted `"{h}h {m}m"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutTimes {
    pub char: String,
    pub fleet: String,
}

/// The dashboard's view of a user: their config plus a payout countdown for each
/// watched account.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDashboard {
    pub config: UserConfig,
    /// One entry per `config.arena_watch.allycodes`, `None` when the account has no
    /// payout offset.
    pub watch_payouts: Vec<Option<PayoutTimes>>,
}

impl UserDashboard {
    pub fn into_dto(self) -> DashboardDto {
        let UserConfig {
            id,
            accounts,
            lang,
            arena_alert,
            arena_watch,
            guild_update,
            guild_tickets,
        } = self.config;

        let allycodes = arena_watch
            .allycodes
            .into_iter()
            .zip(self.watch_payouts.into_iter().chain(std::iter::repeat(None)))
            .map(|(account, payout)| WatchedAccountDto {
                ally_code: account.ally_code(),
                name: account.name,
                last_char: account.last_char,
                last_ship: account.last_ship,
                po_offset: account.po_offset,
                payout: payout.map(|times| PayoutTimesDto {
                    char: times.char,
                    fleet: times.fleet,
                }),
            })
            .collect();

        DashboardDto {
            id,
            accounts: accounts
                .into_iter()
                .map(|account| AccountDto {
                    ally_code: account.ally_code,
                    name: account.name,
                    primary: account.primary,
                    last_char_rank: account.last_char_rank,
                    last_ship_rank: account.last_ship_rank,
                })
                .collect(),
            lang: LangDto {
                language: lang.language,
                swgoh_language: lang.swgoh_language,
            },
            arena_alert: ArenaAlertDto {
                enable_rank_dms: arena_alert.enable_rank_dms,
                arena: arena_alert.arena,
                payout_warning: arena_alert.payout_warning,
                enable_payout_result: arena_alert.enable_payout_result,
            },
            arena_watch: ArenaWatchDto {
                enabled: arena_watch.enabled,
                allycodes,
                report: arena_watch.report,
                showvs: arena_watch.showvs,
            },
            guild_update: GuildUpdateDto {
                enabled: guild_update.enabled,
                allycode: guild_update.allycode,
                sort_by: guild_update.sort_by,
            },
            guild_tickets: GuildTicketsDto {
                enabled: guild_tickets.enabled,
                sort_by: guild_tickets.sort_by,
                show_max: guild_tickets.show_max,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_sparse_legacy_document() {
        let config: UserConfig = from_document(doc! {
            "id": "300000000000000001",
            "accounts": [
                { "allyCode": 123456789, "name": "zeta", "primary": true },
                { "allyCode": "987654321", "name": "Alpha" },
            ],
            "arenaWatch": {
                "allycodes": [{ "allycode": 111222333, "name": "Rival", "poOffset": -300.0 }],
            },
        })
        .unwrap();

        assert_eq!(config.accounts[0].ally_code, "123456789");
        assert_eq!(config.arena_watch.allycodes[0].ally_code(), Some(111222333));
        assert_eq!(config.arena_watch.allycodes[0].po_offset, Some(-300));
        assert_eq!(config.lang, LangSettings::default());
        assert_eq!(config.arena_alert.enable_rank_dms, None);
    }

    #[test]
    fn sort_by_name_ignores_case() {
        let mut config: UserConfig = from_document(doc! {
            "id": "1",
            "accounts": [
                { "allyCode": "1", "name": "bravo" },
                { "allyCode": "2", "name": "Alpha" },
                { "allyCode": "3", "name": "charlie" },
            ],
        })
        .unwrap();

        config.sort_by_name();

        let names: Vec<&str> = config.accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "bravo", "charlie"]);
    }

    #[test]
    fn enable_rank_dms_keeps_bot_field_name() {
        let alert = ArenaAlert {
            enable_rank_dms: Some("primary".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json, serde_json::json!({ "enableRankDMs": "primary" }));
    }

    #[test]
    fn update_uses_dotted_section_paths() {
        let mut update = UserConfigUpdate::new(UserConfigSection::ArenaAlert);
        update.set("arena", "both");
        update.set_some("payoutWarning", Some(10_i32));
        update.set_some::<bool>("enablePayoutResult", None);

        assert_eq!(
            update.to_document().unwrap(),
            doc! { "$set": { "arenaAlert.arena": "both", "arenaAlert.payoutWarning": 10 } }
        );
    }

    #[test]
    fn empty_update_has_no_document() {
        assert_eq!(UserConfigUpdate::new(UserConfigSection::Lang).to_document(), None);
    }

    #[test]
    fn dashboard_dto_pairs_payouts_with_watched_accounts() {
        let config: UserConfig = from_document(doc! {
            "id": "1",
            "arenaWatch": {
                "allycodes": [
                    { "allycode": 111222333, "name": "Rival", "poOffset": 60 },
                    { "allyCode": 444555666, "name": "Friend" },
                ],
            },
        })
        .unwrap();
        let dashboard = UserDashboard {
            config,
            watch_payouts: vec![
                Some(PayoutTimes {
                    char: "1h 0m".to_string(),
                    fleet: "2h 0m".to_string(),
                }),
                None,
            ],
        };

        let dto = dashboard.into_dto();

        let watched = &dto.arena_watch.allycodes;
        assert_eq!(watched[0].ally_code, Some(111222333));
        assert_eq!(watched[0].payout.as_ref().unwrap().fleet, "2h 0m");
        assert_eq!(watched[1].ally_code, Some(444555666));
        assert_eq!(watched[1].payout, None);
    }

    #[test]
    fn sections_parse_from_path() {
        assert_eq!(
            UserConfigSection::from_path("guild-tickets"),
            Some(UserConfigSection::GuildTickets)
        );
        assert_eq!(UserConfigSection::from_path("accounts"), None);
    }
}
