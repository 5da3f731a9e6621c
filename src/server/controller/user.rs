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
        user::DashboardDto,
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, model::user::UserConfigSection,
        service::user::UserService, state::AppState,
    },
};

/// Tag for grouping user endpoints in OpenAPI documentation
pub static USER_TAG: &str = "user";

/// GET /api/user/config - The logged-in user's bot configuration
///
/// Accounts are sorted by name and each watched arena account carries its payout
/// countdowns.
///
/// # Authentication
/// Requires user to be logged in
///
/// # Returns
/// - `200 OK`: DashboardDto, or `null` when the user never registered with the bot
/// - `401 Unauthorized`: Not logged in
#[utoipa::path(
    get,
    path = "/api/user/config",
    tag = USER_TAG,
    responses(
        (status = 200, description = "The user's bot configuration, or null", body = Option<DashboardDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_config(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let (user, _) = AuthGuard::new(&session).require("/dashboard").await?;

    let dashboard = UserService::new(&state.bot_db)
        .dashboard(&user.id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(dashboard.map(|d| d.into_dto()))))
}

/// PUT /api/user/config/{section} - Update one section of the user's configuration
///
/// # Path Parameters
/// - `section`: One of `lang`, `arena-alert`, `arena-watch`, `guild-update`, `guild-tickets`
///
/// # Returns
/// - `200 OK`: SuccessDto
/// - `400 Bad Request`: Form failed validation
/// - `404 Not Found`: Unknown section, or no config exists for the user
#[utoipa::path(
    put,
    path = "/api/user/config/{section}",
    tag = USER_TAG,
    params(
        ("section" = String, Path, description = "lang, arena-alert, arena-watch, guild-update or guild-tickets")
    ),
    request_body(content = serde_json::Value, description = "The section's form"),
    responses(
        (status = 200, description = "Section updated", body = SuccessDto),
        (status = 400, description = "Invalid form", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Unknown section or user", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_config(
    State(state): State<AppState>,
    Path(section): Path<String>,
    session: Session,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    let (user, _) = AuthGuard::new(&session).require("/dashboard").await?;

    let section = UserConfigSection::from_path(&section)
        .ok_or_else(|| AppError::NotFound(format!("Unknown config section: {}", section)))?;

    UserService::new(&state.bot_db)
        .update(&user.id, section, body)
        .await?;

    Ok((StatusCode::OK, Json(SuccessDto::ok())))
}
