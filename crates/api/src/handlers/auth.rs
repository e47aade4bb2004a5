//! Handlers for `/auth` (password login and the caller's profile).

use axum::extract::State;
use axum::Json;
use gemelli_core::error::CoreError;
use gemelli_core::validation::normalize_email;
use gemelli_db::models::user::UserProfile;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::identity::{IdentityError, SessionTokens};
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
///
/// Exchange email and password for identity-service tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<SessionTokens>> {
    let email = normalize_email(&input.email).ok_or_else(|| {
        AppError::Core(CoreError::Validation("El email es requerido".into()))
    })?;
    if input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "La contraseña es requerida".into(),
        )));
    }

    let tokens = state
        .identity
        .sign_in_with_password(&email, &input.password)
        .await
        .map_err(|e| match e {
            IdentityError::Api { .. } => {
                tracing::info!(email = %email, "Rejected login");
                AppError::Core(CoreError::Unauthorized("Credenciales inválidas".into()))
            }
            other => AppError::Identity(other),
        })?;

    tracing::info!(user_id = %tokens.user.id, "User logged in");
    Ok(Json(tokens))
}

/// GET /auth/profile
pub async fn profile(user: CurrentUser) -> Json<UserProfile> {
    Json(user.profile)
}
