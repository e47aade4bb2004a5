//! Row visibility rules derived from the caller's role.

use crate::roles::Role;
use crate::types::DbId;

/// Which org units' rows a caller may see.
///
/// `Unit(None)` is a caller without an org unit; it matches no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgScope {
    All,
    Unit(Option<DbId>),
}

impl OrgScope {
    pub fn for_user(role: Role, org_unit_id: Option<DbId>) -> Self {
        if role.is_it_lead() {
            OrgScope::All
        } else {
            OrgScope::Unit(org_unit_id)
        }
    }

    pub fn is_all(self) -> bool {
        self == OrgScope::All
    }

    pub fn unit(self) -> Option<DbId> {
        match self {
            OrgScope::All => None,
            OrgScope::Unit(id) => id,
        }
    }
}

/// Which tickets a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketScope {
    All,
    OrgUnit(Option<DbId>),
    Requester(DbId),
}

impl TicketScope {
    /// IT lead sees everything, TI and directors their org unit, everyone
    /// else only the tickets they opened.
    pub fn for_user(user_id: DbId, role: Role, org_unit_id: Option<DbId>) -> Self {
        match role {
            Role::LiderTi => TicketScope::All,
            Role::Ti | Role::Director => TicketScope::OrgUnit(org_unit_id),
            Role::Docente | Role::Administrativo => TicketScope::Requester(user_id),
        }
    }
}
