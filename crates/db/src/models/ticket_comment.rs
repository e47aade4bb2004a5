use gemelli_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TicketComment {
    pub id: DbId,
    pub ticket_id: DbId,
    pub usuario_id: Option<DbId>,
    pub comentario: String,
    pub adjunto_url: Option<String>,
    pub fecha: Timestamp,
}

/// A comment with its author's `{nombre}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketCommentEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: TicketComment,
    pub usuario: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct CreateTicketComment {
    pub ticket_id: DbId,
    pub usuario_id: DbId,
    pub comentario: String,
    pub adjunto_url: Option<String>,
}
