#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `entity` is the user-facing noun, e.g. `"Dispositivo"`.
    #[error("{entity} no encontrado")]
    NotFound { entity: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Input is well-formed but semantically unusable (e.g. a stored role
    /// outside the known set).
    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    /// A required upstream dependency is not configured or reachable.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
