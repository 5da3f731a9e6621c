use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    controller::{
        auth::{self, AUTH_TAG},
        guild::{self, GUILD_TAG},
        site::{self, SITE_TAG},
        user::{self, USER_TAG},
    },
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SWGoHBot Web API",
        description = "Guild and user configuration for SWGoHBot"
    ),
    tags(
        (name = AUTH_TAG, description = "Discord login and session"),
        (name = GUILD_TAG, description = "Guild bot configuration"),
        (name = USER_TAG, description = "Personal bot configuration"),
        (name = SITE_TAG, description = "Command list and redirects"),
    )
)]
struct ApiDoc;

/// Builds the application router with API docs served at `/api/docs`.
pub fn router() -> Router<AppState> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(auth::login))
        .routes(routes!(auth::callback))
        .routes(routes!(auth::logout))
        .routes(routes!(auth::get_user))
        .routes(routes!(guild::get_guilds))
        .routes(routes!(guild::get_guild))
        .routes(routes!(guild::update_settings))
        .routes(routes!(guild::save_event))
        .routes(routes!(guild::delete_event))
        .routes(routes!(user::get_config))
        .routes(routes!(user::update_config))
        .routes(routes!(site::get_commands))
        .routes(routes!(site::invite))
        .routes(routes!(site::support_server))
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .layer(TraceLayer::new_for_http())
}
