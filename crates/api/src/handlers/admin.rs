//! Handlers for the `/admin` resource (staff accounts and org units).
//!
//! All handlers require `LIDER_TI` via [`RequireGlobalAdmin`]. Accounts are
//! created at the identity service first and then mirrored into `users`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gemelli_core::audit::action_types;
use gemelli_core::error::CoreError;
use gemelli_core::roles::Role;
use gemelli_core::types::DbId;
use gemelli_core::validation::{normalized_valid_email, validate_nombre, validate_password};
use gemelli_db::models::org_unit::OrgUnit;
use gemelli_db::models::user::{CreateUserProfile, UpdateUserProfile, UserProfile};
use gemelli_db::repositories::{OrgUnitRepo, UserRepo};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::audit_log::record_audit_event_in;
use crate::error::{AppError, AppResult};
use crate::identity::{IdentityError, IdentityUpdate, NewIdentity};
use crate::middleware::rbac::RequireGlobalAdmin;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub rol: Role,
    pub org_unit_id: Option<DbId>,
    #[serde(default = "default_true")]
    pub activo: bool,
}

/// Request body for `PATCH /admin/users/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub nombre: Option<String>,
    pub rol: Option<Role>,
    /// Absent leaves the unit alone; `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub org_unit_id: Option<Option<DbId>>,
    pub activo: Option<bool>,
    pub password: Option<String>,
}

/// Distinguish an explicit `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn unprocessable(msg: impl Into<String>) -> AppError {
    AppError::Core(CoreError::Unprocessable(msg.into()))
}

fn user_not_found() -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Usuario" })
}

/// Identity failures other than a missing configuration become 400s that
/// carry the service's message behind `context`.
fn identity_failure(context: &'static str) -> impl Fn(IdentityError) -> AppError {
    move |err| match err {
        IdentityError::NotConfigured => AppError::Identity(err),
        other => AppError::BadRequest(format!("{context}: {other}")),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireGlobalAdmin(_admin): RequireGlobalAdmin,
) -> AppResult<Json<ListResponse<UserProfile>>> {
    let users = UserRepo::list_profiles(&state.pool)
        .await?
        .into_iter()
        .map(UserProfile::normalized)
        .collect();
    Ok(Json(ListResponse::new(users)))
}

/// POST /admin/users
///
/// Create the account at the identity service, then insert its profile and
/// audit block together. If either write fails the account is deleted again.
pub async fn create_user(
    State(state): State<AppState>,
    RequireGlobalAdmin(admin): RequireGlobalAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserProfile>>)> {
    let nombre = validate_nombre(&input.nombre).map_err(unprocessable)?;
    let email = normalized_valid_email(&input.email)
        .ok_or_else(|| unprocessable("Correo electrónico inválido"))?;
    validate_password(&input.password).map_err(unprocessable)?;

    if UserRepo::find_id_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "El correo electrónico ya está registrado".into(),
        )));
    }

    let account = state
        .identity
        .create_user(&NewIdentity {
            email: email.clone(),
            password: input.password.clone(),
            email_confirm: true,
            user_metadata: json!({
                "full_name": nombre,
                "role": input.rol,
                "org_unit_id": input.org_unit_id,
                "active": input.activo,
            }),
        })
        .await
        .map_err(identity_failure("No se pudo crear el usuario en Supabase"))?;

    let profile = CreateUserProfile {
        id: account.id,
        nombre,
        email,
        rol: input.rol,
        org_unit_id: input.org_unit_id,
        activo: input.activo,
    };

    if let Err(err) = persist_new_user(&state, &profile, admin.id).await {
        tracing::warn!(user_id = %account.id, "Removing account after failed profile write");
        if let Err(cleanup) = state.identity.delete_user(account.id).await {
            tracing::warn!(user_id = %account.id, error = %cleanup, "Account cleanup failed");
        }
        return Err(err);
    }

    let created = UserRepo::find_profile(&state.pool, account.id)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(user_id = %account.id, admin_id = %admin.id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: created.normalized(),
        }),
    ))
}

/// Insert the profile and its `CREATE_USER` block in one transaction.
async fn persist_new_user(
    state: &AppState,
    profile: &CreateUserProfile,
    admin_id: DbId,
) -> AppResult<()> {
    let mut tx = state.pool.begin().await?;
    UserRepo::create(&mut *tx, profile).await.map_err(|err| {
        tracing::error!(user_id = %profile.id, error = %err, "Profile insert failed");
        AppError::BadRequest("No se pudo guardar el perfil del usuario".into())
    })?;
    record_audit_event_in(
        &mut tx,
        state,
        action_types::CREATE_USER,
        profile.id,
        admin_id,
        json!({
            "email": profile.email,
            "rol": profile.rol,
            "org_unit_id": profile.org_unit_id,
            "activo": profile.activo,
        }),
    )
    .await?;
    tx.commit().await?;
    Ok(())
}

/// PATCH /admin/users/{id}
///
/// Partial update of profile fields and/or password. Profile changes are
/// mirrored into the identity service's user metadata. The profile row and
/// the audit block are rolled back if the identity service rejects the
/// change.
pub async fn update_user(
    State(state): State<AppState>,
    RequireGlobalAdmin(admin): RequireGlobalAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let mut update = UpdateUserProfile::default();
    let mut metadata = Map::new();
    let mut audit = Map::new();

    if let Some(nombre) = &input.nombre {
        let nombre = validate_nombre(nombre).map_err(unprocessable)?;
        metadata.insert("full_name".into(), json!(nombre));
        audit.insert("nombre".into(), json!(nombre));
        update.nombre = Some(nombre);
    }
    if let Some(rol) = input.rol {
        metadata.insert("role".into(), json!(rol));
        audit.insert("rol".into(), json!(rol));
        update.rol = Some(rol);
    }
    if let Some(org_unit_id) = input.org_unit_id {
        metadata.insert("org_unit_id".into(), json!(org_unit_id));
        audit.insert("org_unit_id".into(), json!(org_unit_id));
        update.org_unit_id = Some(org_unit_id);
    }
    if let Some(activo) = input.activo {
        metadata.insert("active".into(), json!(activo));
        audit.insert("activo".into(), json!(activo));
        update.activo = Some(activo);
    }
    if let Some(password) = &input.password {
        validate_password(password).map_err(unprocessable)?;
        audit.insert("password_reset".into(), Value::Bool(true));
    }

    if update.is_empty() && input.password.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "No se proporcionaron cambios para actualizar".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;
    if update.is_empty() {
        UserRepo::find_profile(&state.pool, id)
            .await?
            .ok_or_else(user_not_found)?;
    } else if !UserRepo::update(&mut *tx, id, &update).await? {
        return Err(user_not_found());
    }

    let identity_update = IdentityUpdate {
        password: input.password.clone(),
        user_metadata: (!metadata.is_empty()).then_some(Value::Object(metadata)),
    };
    state
        .identity
        .update_user(id, &identity_update)
        .await
        .map_err(identity_failure("No se pudo actualizar el usuario"))?;

    record_audit_event_in(
        &mut tx,
        &state,
        action_types::UPDATE_USER,
        id,
        admin.id,
        Value::Object(audit),
    )
    .await?;
    tx.commit().await?;

    let profile = UserRepo::find_profile(&state.pool, id)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(user_id = %id, admin_id = %admin.id, "User updated");
    Ok(Json(DataResponse {
        data: profile.normalized(),
    }))
}

/// GET /admin/org-units
pub async fn list_org_units(
    State(state): State<AppState>,
    RequireGlobalAdmin(_admin): RequireGlobalAdmin,
) -> AppResult<Json<ListResponse<OrgUnit>>> {
    let units = OrgUnitRepo::list(&state.pool).await?;
    Ok(Json(ListResponse::new(units)))
}
