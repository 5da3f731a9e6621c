//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - MongoDB handles for bot configuration and game data
//! - HTTP client and user-token Discord client
//! - OAuth2 client for Discord authentication
//! - Bot-token Discord HTTP client
//! - The default settings table and the command catalogue

use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    Client, EmptyExtraTokenFields, EndpointNotSet, EndpointSet, RevocationErrorResponseType,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse,
};
use serenity::http::Http;
use std::sync::Arc;

use crate::server::{
    model::settings::DefaultSettings,
    service::{command::CommandCatalog, discord::DiscordApiClient},
};

/// Type alias for the OAuth2 client configured for Discord authentication.
pub(crate) type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Application state containing shared resources and dependencies.
///
/// All fields use cheap-to-clone types:
/// - `mongodb::Database` shares the driver's connection pool
/// - `reqwest::Client` and `DiscordApiClient` use an `Arc` internally
/// - `OAuth2Client` is designed to be cloned
/// - `Arc<Http>`, `Arc<DefaultSettings>` and `CommandCatalog` are reference-counted
#[derive(Clone)]
pub struct AppState {
    /// The bot's database: `guildConfigs` and `users` collections.
    pub bot_db: mongodb::Database,

    /// Game data database, used for unit display names.
    pub swapi_db: mongodb::Database,

    /// HTTP client for making external API requests.
    ///
    /// Configured with security settings (no redirects, request timeout). Used for
    /// the OAuth token exchange.
    pub http_client: reqwest::Client,

    /// OAuth2 client for Discord authentication flow.
    pub oauth_client: OAuth2Client,

    /// Discord REST client acting with a user's OAuth token.
    pub discord_api: DiscordApiClient,

    /// Discord HTTP client for bot-token lookups (guild presence, roles, channels).
    pub discord_http: Arc<Http>,

    /// Default value per guild setting. Never mutated after startup.
    pub defaults: Arc<DefaultSettings>,

    /// Cached `help.json` command catalogue.
    pub commands: CommandCatalog,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `bot_db` - The bot's MongoDB database
    /// - `swapi_db` - The game data MongoDB database
    /// - `http_client` - HTTP client for external API requests
    /// - `oauth_client` - OAuth2 client for Discord authentication
    /// - `discord_api` - User-token Discord client
    /// - `discord_http` - Bot-token Discord HTTP client
    /// - `commands` - Command catalogue
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(
        bot_db: mongodb::Database,
        swapi_db: mongodb::Database,
        http_client: reqwest::Client,
        oauth_client: OAuth2Client,
        discord_api: DiscordApiClient,
        discord_http: Arc<Http>,
        commands: CommandCatalog,
    ) -> Self {
        Self {
            bot_db,
            swapi_db,
            http_client,
            oauth_client,
            discord_api,
            discord_http,
            defaults: Arc::new(DefaultSettings::bot_defaults()),
            commands,
        }
    }
}
