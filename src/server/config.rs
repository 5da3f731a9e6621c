use std::path::PathBuf;

use crate::server::error::{config::ConfigError, AppError};

const DISCORD_AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const DISCORD_API_URL: &str = "https://discord.com/api/v10";

const DEFAULT_PORT: u16 = 3300;
const DEFAULT_SESSION_DATABASE_URL: &str = "sqlite::memory:";
const DEFAULT_DISCORD_TIMEOUT_SECS: u64 = 5;

/// Deployment environment, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::InvalidEnvVar {
                var: "APP_ENV".to_string(),
                reason: format!(
                    "expected development, production or test, got '{}'",
                    other
                ),
            }),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

pub struct Config {
    pub port: u16,
    pub environment: Environment,

    pub discord_client_id: String,
    pub discord_client_secret: String,
    pub discord_redirect_url: String,
    pub discord_bot_token: String,

    pub discord_auth_url: String,
    pub discord_token_url: String,
    pub discord_api_url: String,
    pub discord_timeout_secs: u64,

    pub mongodb_uri: String,
    pub mongodb_bot_db: String,
    pub mongodb_swapi_db: String,

    pub session_database_url: String,

    /// Location of the bot's generated `help.json`.
    pub bot_data_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            port: optional_parsed("PORT", DEFAULT_PORT)?,
            environment: match std::env::var("APP_ENV") {
                Ok(value) => Environment::parse(&value)?,
                Err(_) => Environment::Development,
            },
            discord_client_id: required("DISCORD_CLIENT_ID")?,
            discord_client_secret: required("DISCORD_CLIENT_SECRET")?,
            discord_redirect_url: required("DISCORD_REDIRECT_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            discord_auth_url: DISCORD_AUTH_URL.to_string(),
            discord_token_url: DISCORD_TOKEN_URL.to_string(),
            discord_api_url: std::env::var("DISCORD_API_URL")
                .unwrap_or_else(|_| DISCORD_API_URL.to_string()),
            discord_timeout_secs: optional_parsed(
                "DISCORD_TIMEOUT_SECS",
                DEFAULT_DISCORD_TIMEOUT_SECS,
            )?,
            mongodb_uri: required("MONGODB_URI")?,
            mongodb_bot_db: required("MONGODB_BOT_DB")?,
            mongodb_swapi_db: required("MONGODB_SWAPI_DB")?,
            session_database_url: std::env::var("SESSION_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_SESSION_DATABASE_URL.to_string()),
            bot_data_path: PathBuf::from(required("BOT_DATA_PATH")?),
        })
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
}

fn optional_parsed<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(value) => value.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_environments() {
        assert_eq!(
            Environment::parse("production").unwrap(),
            Environment::Production
        );
        assert!(Environment::parse("production").unwrap().is_production());
        assert!(!Environment::parse("test").unwrap().is_production());
    }

    #[test]
    fn rejects_unknown_environment() {
        assert!(matches!(
            Environment::parse("staging"),
            Err(ConfigError::InvalidEnvVar { .. })
        ));
    }
}
