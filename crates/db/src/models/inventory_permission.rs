//! Delegated inventory-management grants.

use gemelli_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InventoryPermission {
    pub id: DbId,
    pub email: String,
    pub notes: Option<String>,
    pub granted_at: Timestamp,
    pub granted_by: Option<DbId>,
}

/// A grant with the granter's `{nombre, email}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryPermissionWithGranter {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub permission: InventoryPermission,
    pub granted_by_user: Option<serde_json::Value>,
}

/// Insert DTO. `email` must already be normalized.
#[derive(Debug, Clone)]
pub struct CreateInventoryPermission {
    pub email: String,
    pub notes: Option<String>,
    pub granted_by: DbId,
}
