use gemelli_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One `device_specs` row; at most one per device.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DeviceSpecs {
    pub device_id: DbId,
    pub cpu: Option<String>,
    pub cpu_velocidad: Option<String>,
    pub ram: Option<String>,
    pub ram_capacidad: Option<String>,
    pub disco: Option<String>,
    pub disco_capacidad: Option<String>,
    pub os: Option<String>,
    pub licencias: Option<serde_json::Value>,
    pub red: Option<serde_json::Value>,
    pub perifericos: Option<serde_json::Value>,
    pub otros: Option<serde_json::Value>,
}
