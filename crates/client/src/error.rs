use reqwest::StatusCode;

/// Errors raised by the API client and the session helper.
///
/// `Display` yields the message shown to the user in the screen banner.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Required configuration is missing.
    #[error("{0}")]
    MissingConfig(String),

    /// The backend answered with an HTML page instead of JSON.
    #[error(
        "El backend no respondió correctamente. Verifica PUBLIC_API_URL y que la función \
         serverless esté desplegada en /api ({url})."
    )]
    HtmlResponse { url: String },

    /// Non-2xx status; `message` is the detail extracted from the body.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("No se pudo interpretar la respuesta del servidor")]
    InvalidBody,

    /// The request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),

    /// Input rejected before any request was sent.
    #[error("{0}")]
    Invalid(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the persisted token store.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("No se encontró un directorio de configuración para guardar la sesión")]
    NoLocation,
}
