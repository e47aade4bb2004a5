//! Staff profile rows.

use gemelli_core::roles::{normalize_role_value, Role};
use gemelli_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `users` row joined with its org unit name.
///
/// `rol` is the raw stored value; see [`UserProfile::role`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: DbId,
    pub nombre: String,
    pub email: String,
    pub rol: String,
    pub activo: bool,
    pub org_unit_id: Option<DbId>,
    pub org_unit_nombre: Option<String>,
}

impl UserProfile {
    /// The stored role after normalization, if it is a known role.
    pub fn role(&self) -> Option<Role> {
        Role::normalize(&self.rol)
    }

    /// Copy with `rol` rewritten to its normalized form when one exists.
    pub fn normalized(mut self) -> Self {
        if let Some(normalized) = normalize_role_value(&self.rol) {
            self.rol = normalized;
        }
        self
    }
}

/// Insert DTO. `id` is the identity-service account id.
#[derive(Debug, Clone)]
pub struct CreateUserProfile {
    pub id: DbId,
    pub nombre: String,
    pub email: String,
    pub rol: Role,
    pub org_unit_id: Option<DbId>,
    pub activo: bool,
}

/// Partial update. `None` leaves the column unchanged; `org_unit_id:
/// Some(None)` clears the unit.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserProfile {
    pub nombre: Option<String>,
    pub rol: Option<Role>,
    pub org_unit_id: Option<Option<DbId>>,
    pub activo: Option<bool>,
}

impl UpdateUserProfile {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.rol.is_none()
            && self.org_unit_id.is_none()
            && self.activo.is_none()
    }
}
