//! Repository for the `tickets` table.

use gemelli_core::scope::TicketScope;
use gemelli_core::ticket::TicketStatus;
use gemelli_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::ticket::{CreateTicket, Ticket, TicketDetail, TicketFilter, UpdateTicket};

const COLUMNS: &str = "id, titulo, descripcion, prioridad, estado, device_id, solicitante_id, \
                       asignado_a, org_unit_id, fecha_creacion";

/// Ticket columns plus requester, assignee and device summaries.
const DETAIL_SELECT: &str = "SELECT t.id, t.titulo, t.descripcion, t.prioridad, t.estado, \
                t.device_id, t.solicitante_id, t.asignado_a, t.org_unit_id, t.fecha_creacion, \
                CASE WHEN s.id IS NULL THEN NULL \
                     ELSE json_build_object('nombre', s.nombre, 'email', s.email) END AS solicitante, \
                CASE WHEN a.id IS NULL THEN NULL \
                     ELSE json_build_object('nombre', a.nombre) END AS asignado, \
                CASE WHEN d.id IS NULL THEN NULL \
                     ELSE json_build_object('nombre', d.nombre, 'tipo', d.tipo) END AS device \
             FROM tickets t \
             LEFT JOIN users s ON s.id = t.solicitante_id \
             LEFT JOIN users a ON a.id = t.asignado_a \
             LEFT JOIN devices d ON d.id = t.device_id";

pub struct TicketRepo;

impl TicketRepo {
    /// Open a ticket in state `ABIERTO`.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (titulo, descripcion, prioridad, estado, device_id, \
                                  solicitante_id, org_unit_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&input.titulo)
            .bind(&input.descripcion)
            .bind(input.prioridad.as_str())
            .bind(TicketStatus::Abierto.as_str())
            .bind(input.device_id)
            .bind(input.solicitante_id)
            .bind(input.org_unit_id)
            .fetch_one(pool)
            .await
    }

    /// Tickets visible in `filter.scope`, newest first.
    pub async fn list(pool: &PgPool, filter: &TicketFilter) -> Result<Vec<TicketDetail>, sqlx::Error> {
        let (mode, org_unit_id, requester_id) = match filter.scope {
            TicketScope::All => ("all", None, None),
            TicketScope::OrgUnit(unit) => ("org", unit, None),
            TicketScope::Requester(user) => ("own", None, Some(user)),
        };
        let query = format!(
            "{DETAIL_SELECT}
             WHERE (CASE $1::text
                        WHEN 'all' THEN TRUE
                        WHEN 'org' THEN t.org_unit_id = $2::uuid
                        ELSE t.solicitante_id = $3::uuid
                    END)
               AND ($4::text IS NULL OR t.estado = $4)
             ORDER BY t.fecha_creacion DESC"
        );
        sqlx::query_as::<_, TicketDetail>(&query)
            .bind(mode)
            .bind(org_unit_id)
            .bind(requester_id)
            .bind(filter.estado.map(|e| e.as_str()))
            .fetch_all(pool)
            .await
    }

    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TicketDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE t.id = $1");
        sqlx::query_as::<_, TicketDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if no row has that id.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateTicket,
    ) -> Result<Option<Ticket>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE tickets SET
                estado = COALESCE($2, estado),
                prioridad = COALESCE($3, prioridad),
                asignado_a = COALESCE($4, asignado_a)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(input.estado.map(|e| e.as_str()))
            .bind(input.prioridad.map(|p| p.as_str()))
            .bind(input.asignado_a)
            .fetch_optional(executor)
            .await
    }
}
