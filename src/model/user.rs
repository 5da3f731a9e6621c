use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub id: String,
    pub accounts: Vec<AccountDto>,
    pub lang: LangDto,
    pub arena_alert: ArenaAlertDto,
    pub arena_watch: ArenaWatchDto,
    pub guild_update: GuildUpdateDto,
    pub guild_tickets: GuildTicketsDto,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub ally_code: String,
    pub name: String,
    pub primary: bool,
    pub last_char_rank: Option<i64>,
    pub last_ship_rank: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LangDto {
    pub language: Option<String>,
    pub swgoh_language: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArenaAlertDto {
    #[serde(rename = "enableRankDMs")]
    pub enable_rank_dms: Option<String>,
    pub arena: Option<String>,
    pub payout_warning: Option<i64>,
    pub enable_payout_result: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ArenaWatchDto {
    pub enabled: Option<bool>,
    pub allycodes: Vec<WatchedAccountDto>,
    pub report: Option<String>,
    pub showvs: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WatchedAccountDto {
    pub ally_code: Option<i64>,
    pub name: String,
    pub last_char: Option<i64>,
    pub last_ship: Option<i64>,
    pub po_offset: Option<i64>,
    /// Countdowns to the next payouts, absent without a payout offset.
    pub payout: Option<PayoutTimesDto>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct PayoutTimesDto {
    pub char: String,
    pub fleet: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct GuildUpdateDto {
    pub enabled: Option<bool>,
    pub allycode: Option<i64>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuildTicketsDto {
    pub enabled: Option<bool>,
    pub sort_by: Option<String>,
    pub show_max: Option<bool>,
}
