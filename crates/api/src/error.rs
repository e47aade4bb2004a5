use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gemelli_core::error::CoreError;
use serde_json::json;

use crate::identity::IdentityError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `gemelli_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure reported by the identity service.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

pub(crate) const INTERNAL_MESSAGE: &str = "Error interno del servidor";

impl AppError {
    /// Status, machine code and user-facing message for this error.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Unprocessable(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "UNPROCESSABLE_ENTITY",
                    msg.clone(),
                ),
                CoreError::Unavailable(msg) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    msg.clone(),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Identity service ---
            AppError::Identity(err) => match err {
                IdentityError::NotConfigured => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    err.to_string(),
                ),
                IdentityError::Api { message, .. } => {
                    (StatusCode::BAD_REQUEST, "IDENTITY_ERROR", message.clone())
                }
                IdentityError::Request(e) => {
                    tracing::error!(error = %e, "Identity service unreachable");
                    (
                        StatusCode::BAD_REQUEST,
                        "IDENTITY_ERROR",
                        "No se pudo contactar el servicio de autenticación".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Spanish message for a named unique constraint, if it is one users can hit.
fn duplicate_message(constraint: &str) -> Option<&'static str> {
    match constraint {
        "uq_users_email" => Some("El correo electrónico ya está registrado"),
        "uq_inventory_access_grants_email" => Some("El correo ya tiene permisos especiales"),
        _ => None,
    }
}

/// Map a sqlx error onto the wire.
///
/// Known unique constraints become 409, foreign key and check violations
/// become 400, and everything else is logged and reported as a bare 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    let internal = || {
        tracing::error!(error = %err, "Database error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            INTERNAL_MESSAGE.to_string(),
        )
    };

    let sqlx::Error::Database(db_err) = err else {
        return match err {
            sqlx::Error::RowNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Recurso no encontrado".to_string(),
            ),
            _ => internal(),
        };
    };

    match db_err.code().as_deref() {
        Some("23505") => match db_err.constraint().and_then(duplicate_message) {
            Some(message) => (StatusCode::CONFLICT, "CONFLICT", message.to_string()),
            None => internal(),
        },
        Some("23503") => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            "Referencia a un registro inexistente".to_string(),
        ),
        Some("23514") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Valor fuera del rango permitido".to_string(),
        ),
        _ => internal(),
    }
}
