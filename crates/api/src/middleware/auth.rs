//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gemelli_core::error::CoreError;
use gemelli_core::roles::Role;
use gemelli_core::scope::{OrgScope, TicketScope};
use gemelli_core::types::DbId;
use gemelli_db::models::user::UserProfile;
use gemelli_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Token subject extracted from a JWT Bearer token in the `Authorization` header.
///
/// Only the signature and expiry are checked; use [`CurrentUser`] when the
/// handler needs the caller's role.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The account id (from `claims.sub`).
    pub user_id: DbId,
    pub email: Option<String>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Falta el encabezado Authorization".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Formato de Authorization inválido. Se espera: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Token inválido o expirado".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

/// The authenticated caller with their profile loaded from `users`.
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: DbId,
    pub role: Role,
    /// Profile with `rol` already normalized.
    pub profile: UserProfile,
}

impl CurrentUser {
    pub fn org_unit_id(&self) -> Option<DbId> {
        self.profile.org_unit_id
    }

    pub fn org_scope(&self) -> OrgScope {
        OrgScope::for_user(self.role, self.profile.org_unit_id)
    }

    pub fn ticket_scope(&self) -> TicketScope {
        TicketScope::for_user(self.id, self.role, self.profile.org_unit_id)
    }

    /// `LIDER_TI` always passes; otherwise the role must be listed.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.role.is_it_lead() || roles.contains(&self.role)
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;

        let profile = UserRepo::find_profile(&state.pool, auth.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Usuario no autenticado".into()))
            })?;

        let role = profile.role().ok_or_else(|| {
            tracing::warn!(
                user_id = %auth.user_id,
                rol = %profile.rol,
                "Stored role is not recognized"
            );
            AppError::Core(CoreError::Unprocessable(format!(
                "Rol en Supabase inválido: {}",
                profile.rol
            )))
        })?;

        Ok(CurrentUser {
            id: profile.id,
            role,
            profile: profile.normalized(),
        })
    }
}
