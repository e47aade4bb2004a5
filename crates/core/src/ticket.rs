//! Helpdesk ticket states and priorities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Abierto,
    EnProceso,
    Resuelto,
    Cerrado,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Abierto => "ABIERTO",
            TicketStatus::EnProceso => "EN_PROCESO",
            TicketStatus::Resuelto => "RESUELTO",
            TicketStatus::Cerrado => "CERRADO",
        }
    }

    /// Moving a ticket into one of these states is recorded in the audit chain.
    pub fn is_closing(self) -> bool {
        matches!(self, TicketStatus::Resuelto | TicketStatus::Cerrado)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    Baja,
    Media,
    Alta,
    Critica,
}

impl TicketPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketPriority::Baja => "BAJA",
            TicketPriority::Media => "MEDIA",
            TicketPriority::Alta => "ALTA",
            TicketPriority::Critica => "CRITICA",
        }
    }
}

impl_text_enum!(TicketStatus);
impl_text_enum!(TicketPriority);
