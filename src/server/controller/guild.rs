use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, SuccessDto},
        guild::{AccessibleGuildDto, GuildEventDto, GuildViewDto, SettingsSavedDto},
    },
    server::{
        error::AppError,
        middleware::auth::AuthGuard,
        model::form::guild::{GuildEventForm, GuildSettingsForm},
        service::guild::{GuildService, Requester},
        state::AppState,
    },
};

/// Tag for grouping guild endpoints in OpenAPI documentation
pub static GUILD_TAG: &str = "guild";

fn guild_service(state: &AppState) -> GuildService<'_> {
    GuildService::new(
        &state.bot_db,
        &state.swapi_db,
        &state.discord_api,
        &state.discord_http,
        &state.defaults,
    )
}

/// GET /api/guilds - Guilds whose bot config the user may open
///
/// # Authentication
/// Requires user to be logged in
///
/// # Returns
/// - `200 OK`: JSON array of AccessibleGuildDto, configured guilds first
/// - `401 Unauthorized`: Not logged in, or Discord rejected the stored token
#[utoipa::path(
    get,
    path = "/api/guilds",
    tag = GUILD_TAG,
    responses(
        (status = 200, description = "Guilds the user may configure", body = Vec<AccessibleGuildDto>),
        (status = 401, description = "Not logged in or Discord session expired", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_guilds(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let (user, access_token) = AuthGuard::new(&session).require("/guilds").await?;
    let requester = Requester {
        session: &session,
        user_id: &user.id,
        access_token: &access_token,
    };

    let guilds = guild_service(&state).accessible_guilds(&requester).await?;
    let guilds_dto: Vec<_> = guilds.into_iter().map(|g| g.into_dto()).collect();

    Ok((StatusCode::OK, Json(guilds_dto)))
}

/// GET /api/guild/{guild_id} - Guild config page data
///
/// # Authentication
/// Requires user to be logged in and to manage the guild or hold one of its admin roles
///
/// # Returns
/// - `200 OK`: GuildViewDto
/// - `401 Unauthorized`: Not logged in
/// - `403 Forbidden`: No access to the guild
#[utoipa::path(
    get,
    path = "/api/guild/{guild_id}",
    tag = GUILD_TAG,
    params(
        ("guild_id" = String, Path, description = "Discord guild ID")
    ),
    responses(
        (status = 200, description = "Guild config page data", body = GuildViewDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "No access to the guild", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_guild(
    State(state): State<AppState>,
    Path(guild_id): Path<String>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let (user, access_token) = AuthGuard::new(&session)
        .require(&format!("/guild/{}", guild_id))
        .await?;
    let requester = Requester {
        session: &session,
        user_id: &user.id,
        access_token: &access_token,
    };

    let view = guild_service(&state).view(&requester, &guild_id).await?;

    Ok((StatusCode::OK, Json(view.into_dto())))
}

/// POST /api/guild/{guild_id}/settings - Save guild settings
///
/// Values equal to the bot default are removed from the stored config.
///
/// # Returns
/// - `200 OK`: SettingsSavedDto listing set and unset keys
/// - `400 Bad Request`: Form failed validation
/// - `403 Forbidden`: No access to the guild
/// - `404 Not Found`: The bot has no config for the guild
#[utoipa::path(
    post,
    path = "/api/guild/{guild_id}/settings",
    tag = GUILD_TAG,
    params(
        ("guild_id" = String, Path, description = "Discord guild ID")
    ),
    request_body = GuildSettingsForm,
    responses(
        (status = 200, description = "Settings saved", body = SettingsSavedDto),
        (status = 400, description = "Invalid settings", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "No access to the guild", body = ErrorDto),
        (status = 404, description = "The bot has no config for the guild", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Path(guild_id): Path<String>,
    session: Session,
    Json(form): Json<GuildSettingsForm>,
) -> Result<impl IntoResponse, AppError> {
    let (user, access_token) = AuthGuard::new(&session)
        .require(&format!("/guild/{}", guild_id))
        .await?;
    let requester = Requester {
        session: &session,
        user_id: &user.id,
        access_token: &access_token,
    };

    let update = guild_service(&state)
        .update_settings(&requester, &guild_id, form)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SettingsSavedDto {
            set: update.set_keys().map(str::to_string).collect(),
            unset: update.unset_keys().map(str::to_string).collect(),
        }),
    ))
}

/// POST /api/guild/{guild_id}/events - Create or replace an event
///
/// # Returns
/// - `200 OK`: The guild's events after the change
/// - `400 Bad Request`: Form failed validation
/// - `403 Forbidden`: No access to the guild
/// - `404 Not Found`: The bot has no config for the guild
#[utoipa::path(
    post,
    path = "/api/guild/{guild_id}/events",
    tag = GUILD_TAG,
    params(
        ("guild_id" = String, Path, description = "Discord guild ID")
    ),
    request_body = GuildEventForm,
    responses(
        (status = 200, description = "The guild's events after the change", body = Vec<GuildEventDto>),
        (status = 400, description = "Invalid event", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "No access to the guild", body = ErrorDto),
        (status = 404, description = "The bot has no config for the guild", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn save_event(
    State(state): State<AppState>,
    Path(guild_id): Path<String>,
    session: Session,
    Json(form): Json<GuildEventForm>,
) -> Result<impl IntoResponse, AppError> {
    let (user, access_token) = AuthGuard::new(&session)
        .require(&format!("/guild/{}", guild_id))
        .await?;
    let requester = Requester {
        session: &session,
        user_id: &user.id,
        access_token: &access_token,
    };

    let events = guild_service(&state)
        .upsert_event(&requester, &guild_id, form, Utc::now())
        .await?;
    let events_dto: Vec<_> = events.into_iter().map(|e| e.into_dto()).collect();

    Ok((StatusCode::OK, Json(events_dto)))
}

/// DELETE /api/guild/{guild_id}/events/{name} - Delete an event
///
/// # Returns
/// - `200 OK`: SuccessDto
/// - `403 Forbidden`: No access to the guild
/// - `404 Not Found`: No config, or no event with that name
#[utoipa::path(
    delete,
    path = "/api/guild/{guild_id}/events/{name}",
    tag = GUILD_TAG,
    params(
        ("guild_id" = String, Path, description = "Discord guild ID"),
        ("name" = String, Path, description = "Event name")
    ),
    responses(
        (status = 200, description = "Event deleted", body = SuccessDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "No access to the guild", body = ErrorDto),
        (status = 404, description = "No config or no such event", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path((guild_id, name)): Path<(String, String)>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let (user, access_token) = AuthGuard::new(&session)
        .require(&format!("/guild/{}", guild_id))
        .await?;
    let requester = Requester {
        session: &session,
        user_id: &user.id,
        access_token: &access_token,
    };

    guild_service(&state)
        .delete_event(&requester, &guild_id, &name)
        .await?;

    Ok((StatusCode::OK, Json(SuccessDto::ok())))
}
