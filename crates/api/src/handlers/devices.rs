//! Handlers for `/inventory/devices` and the device "hoja de vida".
//!
//! Reads are open to any authenticated user but scoped to their org unit
//! unless they are `LIDER_TI`. Writes require [`RequireInventoryManager`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use gemelli_core::audit::action_types;
use gemelli_core::error::CoreError;
use gemelli_core::inventory::{
    build_specs_record, DeviceLogType, DeviceSpecsInput, DeviceStatus, DeviceType,
};
use gemelli_core::types::DbId;
use gemelli_db::models::audit::AuditBlock;
use gemelli_db::models::backup::Backup;
use gemelli_db::models::device::{
    CreateDevice, Device, DeviceFilter, DeviceWithHolder, UpdateDevice,
};
use gemelli_db::models::device_log::{CreateDeviceLog, DeviceLogEntry};
use gemelli_db::models::device_spec::DeviceSpecs;
use gemelli_db::repositories::{
    AuditChainRepo, BackupRepo, DeviceLogRepo, DeviceRepo, DeviceSpecRepo,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit_log::record_audit_event_in;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireInventoryManager;
use crate::response::{ListResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct DeviceListParams {
    pub estado: Option<DeviceStatus>,
    pub tipo: Option<DeviceType>,
}

/// Request body for `POST /inventory/devices`.
#[derive(Debug, Deserialize)]
pub struct CreateDeviceRequest {
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
    pub specs: Option<DeviceSpecsInput>,
}

/// Everything known about one device.
#[derive(Debug, Serialize)]
pub struct DeviceCv {
    pub device: Device,
    pub specs: Option<DeviceSpecs>,
    pub logs: Vec<DeviceLogEntry>,
    pub backups: Vec<Backup>,
    pub audit: Vec<AuditBlock>,
}

fn device_not_found() -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Dispositivo",
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /inventory/devices?estado&tipo
pub async fn list_devices(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<DeviceListParams>,
) -> AppResult<Json<ListResponse<DeviceWithHolder>>> {
    let filter = DeviceFilter {
        scope: user.org_scope(),
        estado: params.estado,
        tipo: params.tipo,
    };
    let devices = DeviceRepo::list(&state.pool, &filter).await?;
    Ok(Json(ListResponse::new(devices)))
}

/// POST /inventory/devices
///
/// The device joins the caller's org unit. Specs are stored only when at
/// least one value is present. The device row, its specs, the creation log
/// entry and the audit block commit together or not at all.
pub async fn create_device(
    State(state): State<AppState>,
    RequireInventoryManager(user): RequireInventoryManager,
    Json(input): Json<CreateDeviceRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse<Device>>)> {
    let create = CreateDevice {
        nombre: input.nombre,
        tipo: input.tipo,
        estado: input.estado,
        usuario_actual_id: input.usuario_actual_id,
        ubicacion: input.ubicacion,
        imagen: input.imagen,
        notas: input.notas,
        serial: input.serial,
        marca: input.marca,
        modelo: input.modelo,
        org_unit_id: user.org_unit_id(),
        creado_por: user.id,
        fecha_ingreso: Utc::now().date_naive(),
    };
    let mut tx = state.pool.begin().await?;
    let device = DeviceRepo::create(&mut *tx, &create).await?;

    if let Some(record) = input.specs.as_ref().and_then(build_specs_record) {
        DeviceSpecRepo::create(&mut *tx, device.id, &record).await?;
    }

    DeviceLogRepo::create(
        &mut *tx,
        &CreateDeviceLog {
            device_id: device.id,
            tipo: DeviceLogType::Otro,
            descripcion: format!("Dispositivo creado por {}", user.profile.nombre),
            realizado_por: user.id,
        },
    )
    .await?;

    record_audit_event_in(
        &mut tx,
        &state,
        action_types::CREATE_DEVICE,
        device.id,
        user.id,
        json!({ "device_name": device.nombre, "type": create.tipo }),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(device_id = %device.id, user_id = %user.id, "Device created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            data: device,
            message: "Dispositivo creado exitosamente",
        }),
    ))
}

/// GET /inventory/devices/{id}/cv
pub async fn get_device_cv(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeviceCv>> {
    let device = DeviceRepo::find_scoped(&state.pool, id, user.org_scope())
        .await?
        .ok_or_else(device_not_found)?;

    let specs = DeviceSpecRepo::find_by_device(&state.pool, id).await?;
    let logs = DeviceLogRepo::list_for_device(&state.pool, id).await?;
    let backups = BackupRepo::list_for_device(&state.pool, id).await?;
    let audit = AuditChainRepo::list_for_entity(&state.pool, &id.to_string()).await?;

    Ok(Json(DeviceCv {
        device,
        specs,
        logs,
        backups,
        audit,
    }))
}

/// PUT /inventory/devices/{id}
pub async fn update_device(
    State(state): State<AppState>,
    RequireInventoryManager(user): RequireInventoryManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDevice>,
) -> AppResult<Json<MessageResponse<Device>>> {
    let mut tx = state.pool.begin().await?;
    let device = DeviceRepo::update_scoped(&mut *tx, id, user.org_scope(), &input)
        .await?
        .ok_or_else(device_not_found)?;

    DeviceLogRepo::create(
        &mut *tx,
        &CreateDeviceLog {
            device_id: id,
            tipo: DeviceLogType::Otro,
            descripcion: format!("Dispositivo actualizado por {}", user.profile.nombre),
            realizado_por: user.id,
        },
    )
    .await?;

    let mut changes = serde_json::to_value(&input)
        .map_err(|e| AppError::InternalError(format!("Serializing device changes: {e}")))?;
    if let (Some(map), Some(at)) = (changes.as_object_mut(), device.actualizado_en) {
        map.insert("actualizado_en".into(), json!(at));
    }

    record_audit_event_in(
        &mut tx,
        &state,
        action_types::UPDATE_DEVICE,
        id,
        user.id,
        json!({ "changes": changes }),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(device_id = %id, user_id = %user.id, "Device updated");
    Ok(Json(MessageResponse {
        data: device,
        message: "Dispositivo actualizado",
    }))
}
