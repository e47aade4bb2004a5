//! Backup registry rows.

use gemelli_core::backup::{BackupType, StorageKind};
use gemelli_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Backup {
    pub id: DbId,
    pub device_id: DbId,
    pub tipo: String,
    pub almacenamiento: String,
    pub frecuencia: String,
    pub fecha_backup: Timestamp,
    pub evidencia_url: Option<String>,
    pub notas: Option<String>,
    pub realizado_por: Option<DbId>,
}

/// A backup with its device's `{nombre, tipo}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BackupWithDevice {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub backup: Backup,
    pub device: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct CreateBackup {
    pub device_id: DbId,
    pub tipo: BackupType,
    pub almacenamiento: StorageKind,
    pub frecuencia: String,
    pub evidencia_url: Option<String>,
    pub notas: Option<String>,
    pub realizado_por: DbId,
}
