//! Self-service account registration (`POST /auth/register`).
//!
//! Errors render as `{ "error": ... }` (plus `details` on unexpected
//! failures) rather than the `AppError` envelope, since the sign-up form
//! reads `error` directly. The identity service mirrors the new account
//! into `users` through a database trigger, so no profile row is written
//! here.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gemelli_core::roles::Role;
use gemelli_core::types::DbId;
use gemelli_core::validation::{is_plausible_email, MIN_PASSWORD_LENGTH};
use gemelli_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::identity::NewIdentity;
use crate::state::AppState;

pub const MISSING_FIELDS: &str =
    "Datos incompletos. Email, contraseña, nombre y rol son requeridos.";
pub const INVALID_EMAIL: &str = "Formato de email inválido";
pub const SHORT_PASSWORD: &str = "La contraseña debe tener al menos 8 caracteres";
pub const INVALID_ROLE: &str = "Rol inválido";
pub const DUPLICATE_EMAIL: &str = "El email ya está registrado";

/// Request body. Every field is optional at the parsing stage so missing
/// values produce the form's own message instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub nombre: Option<String>,
    pub role: Option<String>,
    pub org_unit_id: Option<DbId>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: DbId,
    pub email: String,
    pub nombre: String,
    pub role: Role,
    pub org_unit_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub message: &'static str,
    pub user: RegisteredUser,
}

#[derive(Debug)]
pub enum RegistrationError {
    /// Input rejected before contacting the identity service.
    Rejected(StatusCode, &'static str),
    /// The identity service refused to create the account.
    Backend(String),
    /// Anything else, reported with its details.
    Unexpected(String),
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        match self {
            RegistrationError::Rejected(status, message) => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            RegistrationError::Backend(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
            RegistrationError::Unexpected(details) => {
                tracing::error!(error = %details, "Registration failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Error interno del servidor",
                        "details": details,
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Validated registration input.
#[derive(Debug, PartialEq)]
pub struct ValidRegistration {
    pub email: String,
    pub password: String,
    pub nombre: String,
    pub role: Role,
    pub org_unit_id: Option<DbId>,
    pub is_active: bool,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Apply the form rules in order: required fields, email shape, password
/// length, role membership.
pub fn validate_registration(
    input: &RegistrationRequest,
) -> Result<ValidRegistration, RegistrationError> {
    let missing = || RegistrationError::Rejected(StatusCode::BAD_REQUEST, MISSING_FIELDS);
    let email = present(&input.email).ok_or_else(missing)?;
    let password = present(&input.password).ok_or_else(missing)?;
    let nombre = present(&input.nombre).ok_or_else(missing)?;
    let role = present(&input.role).ok_or_else(missing)?;

    if !is_plausible_email(email) {
        return Err(RegistrationError::Rejected(
            StatusCode::BAD_REQUEST,
            INVALID_EMAIL,
        ));
    }
    let email = email.to_lowercase();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RegistrationError::Rejected(
            StatusCode::BAD_REQUEST,
            SHORT_PASSWORD,
        ));
    }

    let role: Role = role
        .parse()
        .map_err(|_| RegistrationError::Rejected(StatusCode::BAD_REQUEST, INVALID_ROLE))?;

    Ok(ValidRegistration {
        email,
        password: password.to_string(),
        nombre: nombre.trim().to_string(),
        role,
        org_unit_id: input.org_unit_id,
        is_active: input.is_active.unwrap_or(true),
    })
}

/// POST /auth/register
///
/// Returns 201 with the created account summary.
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<RegistrationResponse>), RegistrationError> {
    let input: RegistrationRequest = serde_json::from_slice(&body)
        .map_err(|e| RegistrationError::Unexpected(e.to_string()))?;
    let valid = validate_registration(&input)?;

    let existing = UserRepo::find_id_by_email(&state.pool, &valid.email)
        .await
        .map_err(|e| RegistrationError::Unexpected(e.to_string()))?;
    if existing.is_some() {
        return Err(RegistrationError::Rejected(
            StatusCode::CONFLICT,
            DUPLICATE_EMAIL,
        ));
    }

    let created = state
        .identity
        .create_user(&NewIdentity {
            email: valid.email.clone(),
            password: valid.password.clone(),
            email_confirm: true,
            user_metadata: json!({
                "nombre": valid.nombre,
                "role": valid.role,
                "org_unit_id": valid.org_unit_id,
                "is_active": valid.is_active,
            }),
        })
        .await
        .map_err(|e| RegistrationError::Backend(e.to_string()))?;

    tracing::info!(user_id = %created.id, role = %valid.role, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            message: "Usuario creado exitosamente",
            user: RegisteredUser {
                id: created.id,
                email: created.email.unwrap_or(valid.email),
                nombre: valid.nombre,
                role: valid.role,
                org_unit_id: valid.org_unit_id,
            },
        }),
    ))
}
