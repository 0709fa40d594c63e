use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tower_cookies::Cookies;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    models::principal::Principal,
    services::auth as auth_service,
    services::session as session_service,
    state::AppState,
    validation::auth::*,
};

/// The request payload for user registration.
#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    /// Either "buyer" or "seller"; defaults to "buyer".
    pub role: Option<String>,
}

/// The request payload for user login.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!("📝 Register attempt for username: {}", payload.username);
    validate_username(&payload.username)?;
    validate_password(&payload.password)?;
    validate_display_name(&payload.name)?;
    let role = parse_requested_role(payload.role.as_deref())?;

    let user = auth_service::create_user(
        &state.db,
        &payload.name,
        &payload.username,
        payload.email.as_deref(),
        &payload.password,
        role,
    )
    .await?;

    tracing::info!("✅ User registered: {}", user.id);

    session_service::issue(&cookies, &state, user.id)?;

    let response = AuthResponse {
        success: true,
        message: "Registration successful. Welcome!".to_string(),
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt for username: {}", payload.username);
    validate_username(&payload.username)?;

    let user = auth_service::authenticate_user(&state.db, &payload.username, &payload.password).await?;

    session_service::issue(&cookies, &state, user.id)?;

    tracing::info!("✅ User logged in: {}", user.id);

    let response = AuthResponse {
        success: true,
        message: "Login successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles user logout.
///
/// Works with or without a live session so that repeating a logout is
/// harmless.
#[axum::debug_handler]
pub async fn logout(cookies: Cookies) -> Result<Response> {
    session_service::terminate(&cookies);

    tracing::info!("👋 Session terminated");

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Returns the principal behind the caller's session cookie.
///
/// API routes sit outside the page gate, so this handler verifies the
/// credential itself. The response is the read-model the UI renders
/// account chrome from; authorization decisions never come from a
/// client-side copy of it.
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<Principal>> {
    let cookie = cookies
        .get(session_service::SESSION_COOKIE)
        .ok_or_else(|| AppError::Authentication("Not signed in".to_string()))?;

    let claims = session_service::verify_credential(&state.keys, cookie.value())
        .ok_or_else(|| AppError::Authentication("Session is invalid or expired".to_string()))?;

    let principal = session_service::resolve_principal(&state.db, &claims)
        .await?
        .ok_or_else(|| AppError::Authentication("Session is invalid or expired".to_string()))?;

    Ok(Json(principal))
}
