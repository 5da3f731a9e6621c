use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    model::{api::ErrorDto, user::UserDto},
    server::{
        error::{auth::AuthError, AppError},
        middleware::{
            auth::AuthGuard,
            session::{AuthSession, CsrfSession, ReturnToSession},
        },
        model::discord::DiscordUser,
        service::auth::AuthService,
        state::AppState,
    },
};

/// Tag for grouping auth endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

/// Where a visitor lands after login when no valid return path was given.
const DEFAULT_RETURN_TO: &str = "/dashboard";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginParams {
    /// Site path to return to after login.
    pub return_to: Option<String>,
}

/// Query parameters for the OAuth callback endpoint.
///
/// Discord omits `code` when the visitor cancels the consent screen.
#[derive(Deserialize)]
pub struct CallbackParams {
    /// CSRF state token to be validated against the session value.
    pub state: Option<String>,
    /// Authorization code from Discord for token exchange.
    pub code: Option<String>,
}

/// GET /api/auth/login - Start the Discord OAuth login
///
/// Stores a fresh OAuth state and the return path in the session, then redirects
/// to Discord's authorize page.
///
/// # Query Parameters
/// - `returnTo`: Site path to come back to. Anything that is not a same-site path
///   falls back to `/dashboard`.
///
/// # Returns
/// - `307 Temporary Redirect`: To the Discord authorize URL
#[utoipa::path(
    get,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    params(
        ("returnTo" = Option<String>, Query, description = "Site path to return to after login")
    ),
    responses(
        (status = 307, description = "Redirect to the Discord authorize page"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<LoginParams>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = AuthService::new(&state.http_client, &state.oauth_client, &state.discord_api);

    let (url, csrf_token) = auth_service.login_url();

    CsrfSession::new(&session)
        .set_token(csrf_token.secret())
        .await?;
    ReturnToSession::new(&session)
        .set(safe_return_to(params.return_to.as_deref()))
        .await?;

    Ok(Redirect::temporary(url.as_str()))
}

/// GET /api/auth/callback - Finish the Discord OAuth login
///
/// Validates the OAuth state, exchanges the code, and stores the user and access
/// token in a session with a fresh id.
///
/// # Returns
/// - `303 See Other`: To the saved return path after login, or to `/` when Discord
///   sent no code or the login could not be completed
/// - `403 Forbidden`: State missing or not matching the session
#[utoipa::path(
    get,
    path = "/api/auth/callback",
    tag = AUTH_TAG,
    params(
        ("state" = Option<String>, Query, description = "OAuth state token"),
        ("code" = Option<String>, Query, description = "OAuth authorization code")
    ),
    responses(
        (status = 303, description = "Redirect to the saved return path, or to / on failure"),
        (status = 403, description = "OAuth state mismatch", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, AppError> {
    validate_csrf(&session, params.state.as_deref()).await?;

    let Some(code) = params.code else {
        return Ok(Redirect::to("/"));
    };

    let auth_service = AuthService::new(&state.http_client, &state.oauth_client, &state.discord_api);
    let authenticated = match auth_service.callback(code).await {
        Ok(authenticated) => authenticated,
        Err(e) => {
            tracing::error!("Discord login failed: {}", e);
            return Ok(Redirect::to("/"));
        }
    };

    let return_to =
        start_session(&session, &authenticated.user, &authenticated.access_token).await?;

    Ok(Redirect::to(safe_return_to(return_to.as_deref())))
}

/// POST /api/auth/logout - Log out
///
/// # Returns
/// - `303 See Other`: To `/` with the session destroyed
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 303, description = "Session destroyed, redirect to /"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).flush().await?;

    Ok(Redirect::to("/"))
}

/// GET /api/auth/user - The logged-in user
///
/// # Returns
/// - `200 OK`: UserDto
/// - `401 Unauthorized`: Not logged in
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "The logged-in user", body = UserDto),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn get_user(session: Session) -> Result<impl IntoResponse, AppError> {
    let (user, _) = AuthGuard::new(&session).require("/").await?;

    Ok((StatusCode::OK, Json(user.into_dto())))
}

async fn validate_csrf(session: &Session, csrf_state: Option<&str>) -> Result<(), AppError> {
    let stored_state = CsrfSession::new(session).take_token().await?;

    match (stored_state, csrf_state) {
        (Some(stored), Some(received)) if stored == received => Ok(()),
        _ => Err(AppError::AuthErr(AuthError::CsrfValidationFailed)),
    }
}

/// Replaces everything the session held with the newly authenticated user.
///
/// # Returns
/// - `Ok(Some(path))` - The return path saved when login started
/// - `Ok(None)` - No return path was saved
async fn start_session(
    session: &Session,
    user: &DiscordUser,
    access_token: &str,
) -> Result<Option<String>, AppError> {
    let return_to = ReturnToSession::new(session).take().await?;

    let auth_session = AuthSession::new(session);
    auth_session.regenerate().await?;
    auth_session.login(user, access_token).await?;

    Ok(return_to)
}

/// Keeps only same-site paths, rejecting protocol-relative `//host` forms.
fn safe_return_to(path: Option<&str>) -> &str {
    match path {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => DEFAULT_RETURN_TO,
    }
}
