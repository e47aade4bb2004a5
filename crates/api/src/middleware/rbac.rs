//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`CurrentUser`] and rejects requests whose role does
//! not meet the requirement with 403 "Permisos insuficientes".

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gemelli_core::error::CoreError;
use gemelli_core::roles::Role;
use gemelli_db::models::inventory_permission::InventoryPermission;
use gemelli_db::repositories::InventoryPermissionRepo;

use super::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

pub const INSUFFICIENT_PERMISSIONS: &str = "Permisos insuficientes";

fn forbidden() -> AppError {
    AppError::Core(CoreError::Forbidden(INSUFFICIENT_PERMISSIONS.into()))
}

/// Requires `LIDER_TI`.
///
/// ```ignore
/// async fn admin_only(RequireGlobalAdmin(user): RequireGlobalAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireGlobalAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireGlobalAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_it_lead() {
            return Err(forbidden());
        }
        Ok(RequireGlobalAdmin(user))
    }
}

/// Requires `TI` or `LIDER_TI`.
pub struct RequireItStaff(pub CurrentUser);

impl FromRequestParts<AppState> for RequireItStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.has_any_role(&[Role::Ti]) {
            return Err(forbidden());
        }
        Ok(RequireItStaff(user))
    }
}

/// Where a caller's inventory-management right comes from.
#[derive(Debug, Clone)]
pub enum InventoryAccess {
    /// `TI` or `LIDER_TI`.
    Role,
    /// A delegated grant for the caller's email.
    Override(InventoryPermission),
    None,
}

impl InventoryAccess {
    pub fn can_manage(&self) -> bool {
        !matches!(self, InventoryAccess::None)
    }

    pub fn source(&self) -> &'static str {
        match self {
            InventoryAccess::Role => "role",
            InventoryAccess::Override(_) => "override",
            InventoryAccess::None => "none",
        }
    }
}

/// Resolve `user`'s inventory access. The grant table is consulted only
/// when the role does not already confer it.
pub async fn inventory_access(
    state: &AppState,
    user: &CurrentUser,
) -> Result<InventoryAccess, AppError> {
    if user.role.manages_inventory() {
        return Ok(InventoryAccess::Role);
    }
    let email = user.profile.email.trim().to_lowercase();
    if email.is_empty() {
        return Ok(InventoryAccess::None);
    }
    Ok(
        match InventoryPermissionRepo::find_by_email(&state.pool, &email).await? {
            Some(permission) => InventoryAccess::Override(permission),
            None => InventoryAccess::None,
        },
    )
}

/// Requires an inventory role or a delegated inventory grant.
pub struct RequireInventoryManager(pub CurrentUser);

impl FromRequestParts<AppState> for RequireInventoryManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !inventory_access(state, &user).await?.can_manage() {
            return Err(forbidden());
        }
        Ok(RequireInventoryManager(user))
    }
}
