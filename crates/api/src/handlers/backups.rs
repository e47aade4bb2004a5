//! Handlers for `/backups`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use gemelli_core::audit::action_types;
use gemelli_core::backup::{BackupType, StorageKind};
use gemelli_core::inventory::DeviceLogType;
use gemelli_core::types::DbId;
use gemelli_db::models::backup::{Backup, BackupWithDevice, CreateBackup};
use gemelli_db::models::device_log::CreateDeviceLog;
use gemelli_db::repositories::{BackupRepo, DeviceLogRepo};
use serde::Deserialize;
use serde_json::json;

use crate::audit_log::record_audit_event_in;
use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireItStaff;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BackupListParams {
    pub device_id: Option<DbId>,
}

/// Request body for `POST /backups`.
#[derive(Debug, Deserialize)]
pub struct CreateBackupRequest {
    pub device_id: DbId,
    pub tipo: BackupType,
    pub almacenamiento: StorageKind,
    pub frecuencia: String,
    pub evidencia_url: Option<String>,
    pub notas: Option<String>,
}

/// GET /backups?device_id
pub async fn list_backups(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(params): Query<BackupListParams>,
) -> AppResult<Json<DataResponse<Vec<BackupWithDevice>>>> {
    let backups = BackupRepo::list(&state.pool, params.device_id).await?;
    Ok(Json(DataResponse { data: backups }))
}

/// POST /backups
///
/// Records the backup, adds a `BACKUP` entry to the device history and
/// seals an audit block against the device.
pub async fn create_backup(
    State(state): State<AppState>,
    RequireItStaff(user): RequireItStaff,
    Json(input): Json<CreateBackupRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse<Backup>>)> {
    let mut tx = state.pool.begin().await?;
    let backup = BackupRepo::create(
        &mut *tx,
        &CreateBackup {
            device_id: input.device_id,
            tipo: input.tipo,
            almacenamiento: input.almacenamiento,
            frecuencia: input.frecuencia,
            evidencia_url: input.evidencia_url,
            notas: input.notas,
            realizado_por: user.id,
        },
    )
    .await?;

    DeviceLogRepo::create(
        &mut *tx,
        &CreateDeviceLog {
            device_id: input.device_id,
            tipo: DeviceLogType::Backup,
            descripcion: format!("Backup {} realizado", input.tipo),
            realizado_por: user.id,
        },
    )
    .await?;

    record_audit_event_in(
        &mut tx,
        &state,
        action_types::BACKUP,
        input.device_id,
        user.id,
        json!({ "backup_type": input.tipo, "storage": input.almacenamiento }),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(backup_id = %backup.id, device_id = %input.device_id, "Backup registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            data: backup,
            message: "Backup registrado",
        }),
    ))
}
