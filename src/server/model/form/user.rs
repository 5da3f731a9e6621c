//! Dashboard forms, one per user config section.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::server::{
    error::AppError,
    model::{
        form::{FormErrors, LANGUAGES, SWGOH_LANGUAGES},
        user::{UserConfigSection, UserConfigUpdate},
    },
};

const RANK_DM_MODES: &[&str] = &["all", "primary", "off"];
const ARENAS: &[&str] = &["char", "fleet", "both", "none"];
const REPORT_MODES: &[&str] = &["climb", "drop", "both"];
const TICKET_SORTS: &[&str] = &["tickets", "name"];
const MAX_PAYOUT_WARNING: i64 = 60;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LangForm {
    pub language: Option<String>,
    pub swgoh_language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArenaAlertForm {
    #[serde(rename = "enableRankDMs")]
    pub enable_rank_dms: Option<String>,
    pub arena: Option<String>,
    /// Minutes before payout, 0 to 60.
    pub payout_warning: Option<i64>,
    pub enable_payout_result: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArenaWatchForm {
    pub enabled: bool,
    pub report: Option<String>,
    pub showvs: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GuildUpdateForm {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuildTicketsForm {
    pub enabled: bool,
    pub sort_by: Option<String>,
    pub show_max: bool,
}

impl LangForm {
    pub fn validate(self) -> Result<UserConfigUpdate, AppError> {
        let mut errors = FormErrors::new();
        errors.check_one_of("language", self.language.as_deref(), LANGUAGES);
        errors.check_one_of(
            "swgohLanguage",
            self.swgoh_language.as_deref(),
            SWGOH_LANGUAGES,
        );
        errors.into_result()?;

        let mut update = UserConfigUpdate::new(UserConfigSection::Lang);
        update.set_some("language", self.language);
        update.set_some("swgohLanguage", self.swgoh_language);
        Ok(update)
    }
}

impl ArenaAlertForm {
    pub fn validate(self) -> Result<UserConfigUpdate, AppError> {
        let mut errors = FormErrors::new();
        errors.check_one_of(
            "enableRankDMs",
            self.enable_rank_dms.as_deref(),
            RANK_DM_MODES,
        );
        errors.check_one_of("arena", self.arena.as_deref(), ARENAS);
        if let Some(warning) = self.payout_warning {
            if !(0..=MAX_PAYOUT_WARNING).contains(&warning) {
                errors.push(format!(
                    "payoutWarning must be between 0 and {}",
                    MAX_PAYOUT_WARNING
                ));
            }
        }
        errors.into_result()?;

        let mut update = UserConfigUpdate::new(UserConfigSection::ArenaAlert);
        update.set_some("enableRankDMs", self.enable_rank_dms);
        update.set_some("arena", self.arena);
        update.set_some("payoutWarning", self.payout_warning);
        update.set_some("enablePayoutResult", self.enable_payout_result);
        Ok(update)
    }
}

impl ArenaWatchForm {
    pub fn validate(self) -> Result<UserConfigUpdate, AppError> {
        let mut errors = FormErrors::new();
        errors.check_one_of("report", self.report.as_deref(), REPORT_MODES);
        errors.into_result()?;

        let mut update = UserConfigUpdate::new(UserConfigSection::ArenaWatch);
        update.set("enabled", self.enabled);
        update.set_some("report", self.report);
        update.set("showvs", self.showvs);
        Ok(update)
    }
}

impl GuildUpdateForm {
    pub fn validate(self) -> Result<UserConfigUpdate, AppError> {
        let mut update = UserConfigUpdate::new(UserConfigSection::GuildUpdate);
        update.set("enabled", self.enabled);
        Ok(update)
    }
}

impl GuildTicketsForm {
    pub fn validate(self) -> Result<UserConfigUpdate, AppError> {
        let mut errors = FormErrors::new();
        errors.check_one_of("sortBy", self.sort_by.as_deref(), TICKET_SORTS);
        errors.into_result()?;

        let mut update = UserConfigUpdate::new(UserConfigSection::GuildTickets);
        update.set("enabled", self.enabled);
        update.set_some("sortBy", self.sort_by);
        update.set("showMax", self.show_max);
        Ok(update)
    }
}
