//! Helpdesk tickets.

use gemelli_core::scope::TicketScope;
use gemelli_core::ticket::{TicketPriority, TicketStatus};
use gemelli_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Ticket {
    pub id: DbId,
    pub titulo: String,
    pub descripcion: String,
    pub prioridad: String,
    pub estado: String,
    pub device_id: Option<DbId>,
    pub solicitante_id: DbId,
    pub asignado_a: Option<DbId>,
    pub org_unit_id: Option<DbId>,
    pub fecha_creacion: Timestamp,
}

/// A ticket with requester `{nombre, email}`, assignee `{nombre}` and
/// device `{nombre, tipo}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ticket: Ticket,
    pub solicitante: Option<serde_json::Value>,
    pub asignado: Option<serde_json::Value>,
    pub device: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub titulo: String,
    pub descripcion: String,
    pub prioridad: TicketPriority,
    pub device_id: Option<DbId>,
    pub solicitante_id: DbId,
    pub org_unit_id: Option<DbId>,
}

/// Partial update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTicket {
    pub estado: Option<TicketStatus>,
    pub prioridad: Option<TicketPriority>,
    pub asignado_a: Option<DbId>,
}

#[derive(Debug, Clone, Copy)]
pub struct TicketFilter {
    pub scope: TicketScope,
    pub estado: Option<TicketStatus>,
}
