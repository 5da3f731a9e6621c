use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Redirect, Json};

use crate::server::state::AppState;

/// Tag for grouping site endpoints in OpenAPI documentation
pub static SITE_TAG: &str = "site";

/// Bot invite with the permissions and scopes the bot needs.
const BOT_INVITE_URL: &str = "https://discord.com/api/oauth2/authorize?client_id=315739499932024834&permissions=277025901632&scope=bot%20applications.commands";
/// Support server invite.
const SUPPORT_SERVER_URL: &str = "https://discord.gg/FfwGvhr";

/// GET /invite - Redirect to the bot invite page
#[utoipa::path(
    get,
    path = "/invite",
    tag = SITE_TAG,
    responses((status = 307, description = "Redirect to the bot invite page")),
)]
pub async fn invite() -> impl IntoResponse {
    Redirect::temporary(BOT_INVITE_URL)
}

/// GET /server - Redirect to the support server
#[utoipa::path(
    get,
    path = "/server",
    tag = SITE_TAG,
    responses((status = 307, description = "Redirect to the support server")),
)]
pub async fn support_server() -> impl IntoResponse {
    Redirect::temporary(SUPPORT_SERVER_URL)
}

/// GET /api/commands - The bot's command catalogue
///
/// # Returns
/// - `200 OK`: The parsed `help.json`, or an error document with zeroed metadata
///   when it could not be loaded
#[utoipa::path(
    get,
    path = "/api/commands",
    tag = SITE_TAG,
    responses((status = 200, description = "The bot's command catalogue", body = serde_json::Value)),
)]
pub async fn get_commands(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.commands.commands().await))
}
