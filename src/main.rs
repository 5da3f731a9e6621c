mod model;
mod server;

use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config, error::AppError, router, service::command::CommandCatalog,
    service::discord::DiscordApiClient, startup, state::AppState,
};

const DEFAULT_LOG_FILTER: &str = "swgohbot_web=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;

    let databases = startup::connect_to_mongo(&config).await?;
    let session = startup::connect_to_session(&config).await?;
    let http_client = startup::setup_reqwest_client(&config)?;
    let oauth_client = startup::setup_oauth_client(&config)?;
    let discord_http = startup::setup_discord_http(&config);
    let discord_api = DiscordApiClient::new(http_client.clone(), config.discord_api_url.clone());

    let commands = CommandCatalog::new(&config.bot_data_path);
    commands.warm().await;

    let app = router::router()
        .with_state(AppState::new(
            databases.bot,
            databases.swapi,
            http_client,
            oauth_client,
            discord_api,
            discord_http,
            commands,
        ))
        .layer(session);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Starting server on port {}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
