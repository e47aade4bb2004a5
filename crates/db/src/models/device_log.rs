//! Device history entries.

use gemelli_core::inventory::DeviceLogType;
use gemelli_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DeviceLog {
    pub id: DbId,
    pub device_id: DbId,
    pub tipo: String,
    pub descripcion: String,
    pub realizado_por: Option<DbId>,
    pub fecha: Timestamp,
}

/// A log entry with the author's `{nombre}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeviceLogEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub log: DeviceLog,
    pub usuario: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct CreateDeviceLog {
    pub device_id: DbId,
    pub tipo: DeviceLogType,
    pub descripcion: String,
    pub realizado_por: DbId,
}
