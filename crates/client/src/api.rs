//! Typed endpoint groups of the REST API.
//!
//! ```ignore
//! let devices = client.devices().list(&DeviceQuery::default()).await?;
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use gemelli_core::backup::{BackupType, StorageKind};
use gemelli_core::dashboard::DashboardMetrics;
use gemelli_core::inventory::{DeviceSpecsInput, DeviceStatus, DeviceType};
use gemelli_core::roles::Role;
use gemelli_core::ticket::{TicketPriority, TicketStatus};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::ClientError;

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// `{ "data": ... }`; list endpoints may add `count`.
#[derive(Debug, Clone, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

/// `{ "data": ..., "message": ... }` returned by mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct Created<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    /// As returned by the server; see [`UserProfile::role`].
    pub rol: String,
    #[serde(default = "default_true")]
    pub activo: bool,
    #[serde(default)]
    pub org_unit_id: Option<Uuid>,
    #[serde(default)]
    pub org_unit_nombre: Option<String>,
}

fn default_true() -> bool {
    true
}

impl UserProfile {
    pub fn role(&self) -> Option<Role> {
        Role::normalize(&self.rol)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrgUnit {
    pub id: Uuid,
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Holder {
    pub nombre: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub nombre: String,
    pub tipo: DeviceType,
    pub estado: DeviceStatus,
    #[serde(default)]
    pub ubicacion: String,
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub marca: Option<String>,
    #[serde(default)]
    pub modelo: Option<String>,
    #[serde(default)]
    pub usuario_actual_id: Option<Uuid>,
    #[serde(default)]
    pub usuario_actual: Option<Holder>,
    #[serde(default)]
    pub org_unit_id: Option<Uuid>,
    #[serde(default)]
    pub fecha_ingreso: Option<NaiveDate>,
    #[serde(default)]
    pub actualizado_en: Option<DateTime<Utc>>,
}

/// A device's history sheet ("hoja de vida").
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCv {
    pub device: Device,
    #[serde(default)]
    pub specs: Option<Value>,
    #[serde(default)]
    pub logs: Vec<DeviceLog>,
    #[serde(default)]
    pub backups: Vec<Backup>,
    #[serde(default)]
    pub audit: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceLog {
    pub tipo: String,
    pub descripcion: String,
    pub fecha: DateTime<Utc>,
    #[serde(default)]
    pub usuario: Option<Holder>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackupDevice {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Backup {
    pub id: Uuid,
    pub device_id: Uuid,
    pub tipo: BackupType,
    pub almacenamiento: StorageKind,
    pub frecuencia: String,
    pub fecha_backup: DateTime<Utc>,
    #[serde(default)]
    pub evidencia_url: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default)]
    pub device: Option<BackupDevice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InventoryPermission {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub granted_at: DateTime<Utc>,
    #[serde(default)]
    pub granted_by: Option<Uuid>,
    #[serde(default)]
    pub granted_by_user: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PermissionCheck {
    pub can_manage: bool,
    pub source: String,
    #[serde(default)]
    pub permission: Option<InventoryPermission>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub titulo: String,
    #[serde(default)]
    pub descripcion: String,
    pub prioridad: TicketPriority,
    pub estado: TicketStatus,
    #[serde(default)]
    pub device_id: Option<Uuid>,
    pub solicitante_id: Uuid,
    #[serde(default)]
    pub asignado_a: Option<Uuid>,
    pub fecha_creacion: DateTime<Utc>,
    #[serde(default)]
    pub solicitante: Option<Holder>,
    #[serde(default)]
    pub asignado: Option<Holder>,
    #[serde(default)]
    pub device: Option<BackupDevice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketComment {
    pub id: Uuid,
    pub comentario: String,
    #[serde(default)]
    pub adjunto_url: Option<String>,
    pub fecha: DateTime<Utc>,
    #[serde(default)]
    pub usuario: Option<Holder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketWithComments {
    pub ticket: Ticket,
    #[serde(default)]
    pub comments: Vec<TicketComment>,
}

/// Tokens returned by `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub email: String,
    pub nombre: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationResponse {
    pub message: String,
    pub user: RegisteredUser,
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<DeviceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<DeviceType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDevice {
    pub nombre: String,
    pub tipo: DeviceType,
    pub estado: DeviceStatus,
    pub ubicacion: String,
    pub notas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marca: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modelo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specs: Option<DeviceSpecsInput>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<DeviceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ubicacion: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBackup {
    pub device_id: Uuid,
    pub tipo: BackupType,
    pub almacenamiento: StorageKind,
    pub frecuencia: String,
    pub evidencia_url: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTicket {
    pub titulo: String,
    pub descripcion: String,
    pub prioridad: TicketPriority,
    pub device_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prioridad: Option<TicketPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asignado_a: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub rol: Role,
    pub org_unit_id: Option<Uuid>,
    pub activo: bool,
}

/// Partial user update; only set fields are sent, except `org_unit_id`
/// which is sent as `null` when explicitly cleared.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_unit_id: Option<Option<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRegistration {
    pub email: String,
    pub password: String,
    pub nombre: String,
    pub role: Role,
    pub org_unit_id: Option<Uuid>,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Endpoint groups
// ---------------------------------------------------------------------------

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi(self)
    }

    pub fn devices(&self) -> DevicesApi<'_> {
        DevicesApi(self)
    }

    pub fn inventory_permissions(&self) -> PermissionsApi<'_> {
        PermissionsApi(self)
    }

    pub fn tickets(&self) -> TicketsApi<'_> {
        TicketsApi(self)
    }

    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi(self)
    }

    pub fn backups(&self) -> BackupsApi<'_> {
        BackupsApi(self)
    }

    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi(self)
    }
}

/// Append `?k=v&...` for the given pairs, if any.
fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", encode_component(v)))
        .collect();
    format!("{path}?{}", query.join("&"))
}

/// Percent-encode a query component (RFC 3986 unreserved set kept).
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

pub struct AuthApi<'a>(&'a ApiClient);

impl AuthApi<'_> {
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = json!({ "email": email, "password": password });
        self.0.send_json(Method::POST, "/auth/login", &body).await
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        self.0.get_json("/auth/profile").await
    }

    pub async fn register(
        &self,
        input: &NewRegistration,
    ) -> Result<RegistrationResponse, ClientError> {
        self.0.send_json(Method::POST, "/auth/register", input).await
    }
}

pub struct DevicesApi<'a>(&'a ApiClient);

impl DevicesApi<'_> {
    pub async fn list(&self, query: &DeviceQuery) -> Result<Vec<Device>, ClientError> {
        let mut pairs = Vec::new();
        if let Some(estado) = query.estado {
            pairs.push(("estado", estado.to_string()));
        }
        if let Some(tipo) = query.tipo {
            pairs.push(("tipo", tipo.to_string()));
        }
        let envelope: Data<Vec<Device>> =
            self.0.get_json(&with_query("/inventory/devices", &pairs)).await?;
        Ok(envelope.data)
    }

    pub async fn cv(&self, id: Uuid) -> Result<DeviceCv, ClientError> {
        self.0.get_json(&format!("/inventory/devices/{id}/cv")).await
    }

    pub async fn create(&self, input: &NewDevice) -> Result<Device, ClientError> {
        let created: Created<Device> = self
            .0
            .send_json(Method::POST, "/inventory/devices", input)
            .await?;
        Ok(created.data)
    }

    pub async fn update(&self, id: Uuid, changes: &DeviceChanges) -> Result<Device, ClientError> {
        let updated: Created<Device> = self
            .0
            .send_json(Method::PUT, &format!("/inventory/devices/{id}"), changes)
            .await?;
        Ok(updated.data)
    }
}

pub struct PermissionsApi<'a>(&'a ApiClient);

impl PermissionsApi<'_> {
    pub async fn list(&self) -> Result<Vec<InventoryPermission>, ClientError> {
        let envelope: Data<Vec<InventoryPermission>> =
            self.0.get_json("/inventory/permissions").await?;
        Ok(envelope.data)
    }

    pub async fn create(
        &self,
        email: &str,
        notes: Option<&str>,
    ) -> Result<InventoryPermission, ClientError> {
        let body = json!({ "email": email, "notes": notes });
        let created: Created<InventoryPermission> = self
            .0
            .send_json(Method::POST, "/inventory/permissions", &body)
            .await?;
        Ok(created.data)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), ClientError> {
        self.0
            .send_empty(Method::DELETE, &format!("/inventory/permissions/{id}"))
            .await
    }

    pub async fn check(&self) -> Result<PermissionCheck, ClientError> {
        self.0.get_json("/inventory/permissions/check").await
    }
}

pub struct TicketsApi<'a>(&'a ApiClient);

impl TicketsApi<'_> {
    pub async fn list(&self, estado: Option<TicketStatus>) -> Result<Vec<Ticket>, ClientError> {
        let pairs: Vec<(&str, String)> = estado
            .map(|e| vec![("estado", e.to_string())])
            .unwrap_or_default();
        let envelope: Data<Vec<Ticket>> =
            self.0.get_json(&with_query("/tickets", &pairs)).await?;
        Ok(envelope.data)
    }

    pub async fn get(&self, id: Uuid) -> Result<TicketWithComments, ClientError> {
        self.0.get_json(&format!("/tickets/{id}")).await
    }

    pub async fn create(&self, input: &NewTicket) -> Result<Ticket, ClientError> {
        let created: Created<Ticket> =
            self.0.send_json(Method::POST, "/tickets", input).await?;
        Ok(created.data)
    }

    pub async fn update(&self, id: Uuid, changes: &TicketChanges) -> Result<Ticket, ClientError> {
        let updated: Created<Ticket> = self
            .0
            .send_json(Method::PUT, &format!("/tickets/{id}"), changes)
            .await?;
        Ok(updated.data)
    }

    pub async fn add_comment(&self, id: Uuid, comentario: &str) -> Result<(), ClientError> {
        let body = json!({ "ticket_id": id, "comentario": comentario });
        let _: Value = self
            .0
            .send_json(Method::POST, &format!("/tickets/{id}/comments"), &body)
            .await?;
        Ok(())
    }
}

pub struct DashboardApi<'a>(&'a ApiClient);

impl DashboardApi<'_> {
    pub async fn metrics(&self) -> Result<DashboardMetrics, ClientError> {
        self.0.get_json("/dashboard/metrics").await
    }
}

pub struct BackupsApi<'a>(&'a ApiClient);

impl BackupsApi<'_> {
    pub async fn list(&self, device_id: Option<Uuid>) -> Result<Vec<Backup>, ClientError> {
        let pairs: Vec<(&str, String)> = device_id
            .map(|id| vec![("device_id", id.to_string())])
            .unwrap_or_default();
        let envelope: Data<Vec<Backup>> =
            self.0.get_json(&with_query("/backups", &pairs)).await?;
        Ok(envelope.data)
    }

    pub async fn create(&self, input: &NewBackup) -> Result<Backup, ClientError> {
        let created: Created<Backup> =
            self.0.send_json(Method::POST, "/backups", input).await?;
        Ok(created.data)
    }
}

pub struct AdminApi<'a>(&'a ApiClient);

impl AdminApi<'_> {
    pub async fn list_users(&self) -> Result<Vec<UserProfile>, ClientError> {
        let envelope: Data<Vec<UserProfile>> = self.0.get_json("/admin/users").await?;
        Ok(envelope.data)
    }

    pub async fn create_user(&self, input: &NewUser) -> Result<UserProfile, ClientError> {
        let created: Data<UserProfile> =
            self.0.send_json(Method::POST, "/admin/users", input).await?;
        Ok(created.data)
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> Result<UserProfile, ClientError> {
        let updated: Data<UserProfile> = self
            .0
            .send_json(Method::PATCH, &format!("/admin/users/{id}"), changes)
            .await?;
        Ok(updated.data)
    }

    pub async fn list_org_units(&self) -> Result<Vec<OrgUnit>, ClientError> {
        let envelope: Data<Vec<OrgUnit>> = self.0.get_json("/admin/org-units").await?;
        Ok(envelope.data)
    }
}
