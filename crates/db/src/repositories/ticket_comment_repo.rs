//! Repository for the `ticket_comments` table.

use gemelli_core::types::DbId;
use sqlx::PgPool;

use crate::models::ticket_comment::{CreateTicketComment, TicketComment, TicketCommentEntry};

const COLUMNS: &str = "id, ticket_id, usuario_id, comentario, adjunto_url, fecha";

pub struct TicketCommentRepo;

impl TicketCommentRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTicketComment,
    ) -> Result<TicketComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_comments (ticket_id, usuario_id, comentario, adjunto_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TicketComment>(&query)
            .bind(input.ticket_id)
            .bind(input.usuario_id)
            .bind(&input.comentario)
            .bind(&input.adjunto_url)
            .fetch_one(pool)
            .await
    }

    /// Comments on a ticket, oldest first, with the author's name.
    pub async fn list_for_ticket(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketCommentEntry>, sqlx::Error> {
        sqlx::query_as::<_, TicketCommentEntry>(
            "SELECT c.id, c.ticket_id, c.usuario_id, c.comentario, c.adjunto_url, c.fecha,
                    CASE WHEN u.id IS NULL THEN NULL
                         ELSE json_build_object('nombre', u.nombre)
                    END AS usuario
             FROM ticket_comments c
             LEFT JOIN users u ON u.id = c.usuario_id
             WHERE c.ticket_id = $1
             ORDER BY c.fecha ASC",
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await
    }
}
