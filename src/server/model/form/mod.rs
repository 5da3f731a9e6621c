//! Submitted forms and their validation.
//!
//! Each form deserializes loosely from the request body and is then checked as a
//! whole. All problems are collected before failing, so one 400 response lists
//! everything the visitor needs to fix.

pub mod guild;
pub mod user;

use crate::server::error::AppError;

/// Bot interface languages.
pub const LANGUAGES: &[&str] = &["en_US", "de_DE", "es_SP", "ko_KR", "pt_BR"];

/// Game data locales.
pub const SWGOH_LANGUAGES: &[&str] = &[
    "ENG_US", "GER_DE", "SPA_XM", "FRE_FR", "RUS_RU", "POR_BR", "KOR_KR", "ITA_IT", "TUR_TR",
    "CHS_CN", "CHT_CN", "IND_ID", "JPN_JP", "THA_TH",
];

pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// Validation messages gathered while checking one form.
#[derive(Debug, Default)]
pub struct FormErrors {
    messages: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Records an error unless `value` is absent or one of `allowed`.
    pub fn check_one_of(&mut self, field: &str, value: Option<&str>, allowed: &[&str]) {
        if let Some(value) = value {
            if !allowed.contains(&value) {
                self.push(format!(
                    "Invalid {}: expected one of {}",
                    field,
                    allowed.join(", ")
                ));
            }
        }
    }

    /// Records an error when `value` is longer than `max` characters.
    pub fn check_max_length(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(value) = value {
            if value.chars().count() > max {
                self.push(format!("{} must be at most {} characters", field, max));
            }
        }
    }

    /// Records an error unless `value` is absent or a snowflake.
    pub fn check_snowflake(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value {
            if !is_snowflake(value) {
                self.push(format!("{} must be a Discord ID", field));
            }
        }
    }

    /// Parses a comma-separated positive integer list, recording an error on failure.
    pub fn parse_positive_list(&mut self, value: Option<&str>) -> Option<Vec<i64>> {
        match value.map(parse_positive_list) {
            Some(Ok(list)) => Some(list),
            Some(Err(message)) => {
                self.push(message);
                None
            }
            None => None,
        }
    }

    /// Fails with a 400 carrying every collected message.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(AppError::BadRequest(self.messages.join("; ")))
        }
    }
}

/// Whether `value` looks like a Discord snowflake: 17 to 19 ASCII digits.
pub fn is_snowflake(value: &str) -> bool {
    (17..=19).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

/// Parses `"24, 2,1"` into `[24, 2, 1]`.
///
/// Blank parts are skipped. Every part that is not a positive integer is reported
/// in a single message.
pub fn parse_positive_list(value: &str) -> Result<Vec<i64>, String> {
    let parts: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let mut numbers = Vec::with_capacity(parts.len());
    let mut invalid = Vec::new();
    for part in parts {
        let parsed = if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse::<i64>().ok().filter(|n| *n > 0)
        } else {
            None
        };
        match parsed {
            Some(n) => numbers.push(n),
            None => invalid.push(format!("\"{}\"", part)),
        }
    }

    if invalid.is_empty() {
        Ok(numbers)
    } else {
        Err(format!(
            "Invalid values: {}. Use positive integers only.",
            invalid.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_length_bounds() {
        assert!(is_snowflake("12345678901234567"));
        assert!(is_snowflake("123456789012345678"));
        assert!(is_snowflake("1234567890123456789"));
        assert!(!is_snowflake("12345"));
        assert!(!is_snowflake("12345678901234567890"));
        assert!(!is_snowflake("general"));
        assert!(!is_snowflake(""));
    }

    #[test]
    fn positive_list_skips_blank_parts() {
        assert_eq!(parse_positive_list("24, 2,,1 ,"), Ok(vec![24, 2, 1]));
        assert_eq!(parse_positive_list(""), Ok(vec![]));
    }

    #[test]
    fn positive_list_reports_every_invalid_part() {
        let message = parse_positive_list("5, 0, -1, x").unwrap_err();
        assert_eq!(
            message,
            r#"Invalid values: "0", "-1", "x". Use positive integers only."#
        );
    }

    #[test]
    fn errors_join_into_bad_request() {
        let mut errors = FormErrors::new();
        errors.push("first");
        errors.push("second");

        match errors.into_result() {
            Err(AppError::BadRequest(message)) => assert_eq!(message, "first; second"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }
}
