use std::{sync::Arc, time::Duration};

use oauth2::{basic::BasicClient, AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use serenity::http::Http;
use tower_sessions::{
    cookie::SameSite, session_store::ExpiredDeletion, Expiry, SessionManagerLayer,
};
use tower_sessions_sqlx_store::{sqlx::SqlitePool, SqliteStore};

use crate::server::{
    config::Config,
    error::{config::ConfigError, AppError},
    state::OAuth2Client,
};

/// How often expired session records are purged from the store.
const SESSION_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Inactivity period after which a session expires.
const SESSION_INACTIVITY_DAYS: i64 = 7;

/// MongoDB handles for the bot's configuration and the game data databases.
pub struct Databases {
    pub bot: mongodb::Database,
    pub swapi: mongodb::Database,
}

/// Connects to MongoDB and selects the bot and game data databases.
///
/// The driver connects lazily, so this only fails on a malformed URI or
/// unresolvable SRV record. The first query surfaces connectivity problems.
///
/// # Arguments
/// - `config` - Application configuration containing the MongoDB URI and database names
///
/// # Returns
/// - `Ok(Databases)` - Handles to both databases
/// - `Err(AppError::MongoErr(_))` - Failed to parse the URI or build the client
pub async fn connect_to_mongo(config: &Config) -> Result<Databases, AppError> {
    let client = mongodb::Client::with_uri_str(&config.mongodb_uri).await?;

    Ok(Databases {
        bot: client.database(&config.mongodb_bot_db),
        swapi: client.database(&config.mongodb_swapi_db),
    })
}

/// Creates the session layer backed by a SQLite session store.
///
/// Opens the session database, creates the session table if needed, and spawns a
/// background task that deletes expired sessions. Cookies are HTTP-only, SameSite=Lax,
/// marked secure in production, and expire after 7 days of inactivity.
///
/// # Arguments
/// - `config` - Application configuration containing the session database URL
///
/// # Returns
/// - `Ok(SessionManagerLayer<SqliteStore>)` - Session layer ready for the router
/// - `Err(AppError::SqlxErr(_))` - Failed to open the database or create the table
pub async fn connect_to_session(
    config: &Config,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let pool = SqlitePool::connect(&config.session_database_url).await?;
    let session_store = SqliteStore::new(pool);
    session_store.migrate().await?;

    tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(
                SESSION_CLEANUP_INTERVAL_SECS,
            )),
    );

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.environment.is_production())
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            SESSION_INACTIVITY_DAYS,
        )));

    Ok(session_layer)
}

/// Builds the shared HTTP client.
///
/// Redirects are never followed and every request carries the configured timeout.
///
/// # Returns
/// - `Ok(reqwest::Client)` - Configured client
/// - `Err(AppError::ReqwestErr(_))` - TLS backend failed to initialize
pub fn setup_reqwest_client(config: &Config) -> Result<reqwest::Client, AppError> {
    let client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(config.discord_timeout_secs))
        .build()?;

    Ok(client)
}

/// Builds the Discord OAuth2 client from configuration.
pub fn setup_oauth_client(config: &Config) -> Result<OAuth2Client, AppError> {
    let client = build_oauth_client(
        &config.discord_client_id,
        &config.discord_client_secret,
        &config.discord_auth_url,
        &config.discord_token_url,
        &config.discord_redirect_url,
    )?;

    Ok(client)
}

/// Builds an OAuth2 client with explicit endpoints.
///
/// # Returns
/// - `Ok(OAuth2Client)` - Client with auth, token and redirect URLs set
/// - `Err(ConfigError::InvalidUrl)` - One of the URLs failed to parse
pub fn build_oauth_client(
    client_id: &str,
    client_secret: &str,
    auth_url: &str,
    token_url: &str,
    redirect_url: &str,
) -> Result<OAuth2Client, ConfigError> {
    let client = BasicClient::new(ClientId::new(client_id.to_string()))
        .set_client_secret(ClientSecret::new(client_secret.to_string()))
        .set_auth_uri(AuthUrl::new(auth_url.to_string()).map_err(invalid_url("auth_url"))?)
        .set_token_uri(TokenUrl::new(token_url.to_string()).map_err(invalid_url("token_url"))?)
        .set_redirect_uri(
            RedirectUrl::new(redirect_url.to_string())
                .map_err(invalid_url("DISCORD_REDIRECT_URL"))?,
        );

    Ok(client)
}

fn invalid_url(var: &'static str) -> impl FnOnce(url::ParseError) -> ConfigError {
    move |source| ConfigError::InvalidUrl {
        var: var.to_string(),
        source,
    }
}

/// Creates the bot-token Discord HTTP client.
///
/// No gateway connection is opened; the client is only used for guild, role and
/// channel lookups.
pub fn setup_discord_http(config: &Config) -> Arc<Http> {
    Arc::new(Http::new(&config.discord_bot_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oauth_client_rejects_invalid_redirect_url() {
        let result = build_oauth_client(
            "id",
            "secret",
            "https://discord.com/oauth2/authorize",
            "https://discord.com/api/oauth2/token",
            "not a url",
        );

        match result {
            Err(ConfigError::InvalidUrl { var, .. }) => assert_eq!(var, "DISCORD_REDIRECT_URL"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected an invalid URL error"),
        }
    }
}
