//! Device inventory rows.

use chrono::NaiveDate;
use gemelli_core::inventory::{DeviceStatus, DeviceType};
use gemelli_core::scope::OrgScope;
use gemelli_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Device {
    pub id: DbId,
    pub nombre: String,
    pub tipo: String,
    pub estado: String,
    pub usuario_actual_id: Option<DbId>,
    pub ubicacion: String,
    pub imagen: Option<String>,
    pub notas: Option<String>,
    pub serial: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub org_unit_id: Option<DbId>,
    pub creado_por: Option<DbId>,
    pub fecha_ingreso: NaiveDate,
    pub actualizado_en: Option<Timestamp>,
}

/// A device plus the `{nombre, email}` of its current holder.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeviceWithHolder {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub device: Device,
    pub usuario_actual: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct CreateDevice {
    pub nombre: String,
    pub tipo: DeviceType,
    pub estado: DeviceStatus,
    pub usuario_actual_id: Option<DbId>,
    pub ubicacion: String,
    pub imagen: Option<String>,
    pub notas: Option<String>,
    pub serial: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub org_unit_id: Option<DbId>,
    pub creado_por: DbId,
    pub fecha_ingreso: NaiveDate,
}

/// Partial update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDevice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<DeviceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario_actual_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ubicacion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marca: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modelo: Option<String>,
}

/// Filters for [`DeviceRepo::list`](crate::repositories::DeviceRepo::list).
#[derive(Debug, Clone, Copy)]
pub struct DeviceFilter {
    pub scope: OrgScope,
    pub estado: Option<DeviceStatus>,
    pub tipo: Option<DeviceType>,
}
