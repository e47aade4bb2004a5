//! Handlers for `/inventory/permissions` (delegated inventory grants).
//!
//! Listing, granting and revoking require `LIDER_TI`; the check endpoint is
//! open to any authenticated user and reports on the caller.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gemelli_core::audit::action_types;
use gemelli_core::error::CoreError;
use gemelli_core::types::DbId;
use gemelli_core::validation::{normalized_valid_email, MAX_NOTES_LENGTH};
use gemelli_db::models::inventory_permission::{
    CreateInventoryPermission, InventoryPermission, InventoryPermissionWithGranter,
};
use gemelli_db::repositories::InventoryPermissionRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit_log::record_audit_event_in;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::{inventory_access, InventoryAccess, RequireGlobalAdmin};
use crate::response::{ListResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `POST /inventory/permissions`.
#[derive(Debug, Deserialize)]
pub struct GrantPermissionRequest {
    pub email: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PermissionCheck {
    pub can_manage: bool,
    /// `role`, `override` or `none`.
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<InventoryPermission>,
}

/// GET /inventory/permissions/check
pub async fn check_permission(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<PermissionCheck>> {
    let access = inventory_access(&state, &user).await?;
    let can_manage = access.can_manage();
    let source = access.source();
    let permission = match access {
        InventoryAccess::Override(permission) => Some(permission),
        InventoryAccess::Role | InventoryAccess::None => None,
    };
    Ok(Json(PermissionCheck {
        can_manage,
        source,
        permission,
    }))
}

/// GET /inventory/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    RequireGlobalAdmin(_admin): RequireGlobalAdmin,
) -> AppResult<Json<ListResponse<InventoryPermissionWithGranter>>> {
    let grants = InventoryPermissionRepo::list(&state.pool).await?;
    Ok(Json(ListResponse::new(grants)))
}

/// POST /inventory/permissions
pub async fn grant_permission(
    State(state): State<AppState>,
    RequireGlobalAdmin(admin): RequireGlobalAdmin,
    Json(input): Json<GrantPermissionRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse<InventoryPermission>>)> {
    let email = normalized_valid_email(&input.email).ok_or_else(|| {
        AppError::Core(CoreError::Unprocessable("Correo electrónico inválido".into()))
    })?;

    let notes = input
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    if notes
        .as_ref()
        .is_some_and(|n| n.chars().count() > MAX_NOTES_LENGTH)
    {
        return Err(AppError::Core(CoreError::Unprocessable(format!(
            "Las notas no pueden superar {MAX_NOTES_LENGTH} caracteres"
        ))));
    }

    if InventoryPermissionRepo::find_by_email(&state.pool, &email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "El correo ya tiene permisos especiales".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;
    let created = InventoryPermissionRepo::create(
        &mut *tx,
        &CreateInventoryPermission {
            email: email.clone(),
            notes,
            granted_by: admin.id,
        },
    )
    .await?;

    record_audit_event_in(
        &mut tx,
        &state,
        action_types::GRANT_INVENTORY_ACCESS,
        created.id,
        admin.id,
        json!({ "email": email }),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        permission_id = %created.id,
        admin_id = %admin.id,
        "Inventory access granted"
    );
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            data: created,
            message: "Permiso concedido",
        }),
    ))
}

/// DELETE /inventory/permissions/{id}
pub async fn revoke_permission(
    State(state): State<AppState>,
    RequireGlobalAdmin(admin): RequireGlobalAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = InventoryPermissionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Permiso" }))?;

    let mut tx = state.pool.begin().await?;
    InventoryPermissionRepo::delete(&mut *tx, id).await?;

    record_audit_event_in(
        &mut tx,
        &state,
        action_types::REVOKE_INVENTORY_ACCESS,
        id,
        admin.id,
        json!({ "email": existing.email }),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(permission_id = %id, admin_id = %admin.id, "Inventory access revoked");
    Ok(StatusCode::NO_CONTENT)
}
