//! Repository for the `users` table.

use gemelli_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUserProfile, UpdateUserProfile, UserProfile};

/// Profile columns joined with the org unit name.
const PROFILE_SELECT: &str = "SELECT u.id, u.nombre, u.email, u.rol, u.activo, u.org_unit_id, \
                              o.nombre AS org_unit_nombre \
                              FROM users u LEFT JOIN org_units o ON o.id = u.org_unit_id";

pub struct UserRepo;

impl UserRepo {
    /// Insert a profile for an identity-service account.
    pub async fn create<'e, E>(executor: E, input: &CreateUserProfile) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO users (id, nombre, email, rol, org_unit_id, activo)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(input.id)
        .bind(&input.nombre)
        .bind(&input.email)
        .bind(input.rol.as_str())
        .bind(input.org_unit_id)
        .bind(input.activo)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find_profile(pool: &PgPool, id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("{PROFILE_SELECT} WHERE u.id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up a user id by email, ignoring case.
    pub async fn find_id_by_email(pool: &PgPool, email: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM users WHERE lower(email) = lower($1) LIMIT 1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// All profiles ordered by name.
    pub async fn list_profiles(pool: &PgPool) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query = format!("{PROFILE_SELECT} ORDER BY u.nombre");
        sqlx::query_as::<_, UserProfile>(&query).fetch_all(pool).await
    }

    /// Apply a partial update. Returns `false` if no row has that id.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateUserProfile,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE users SET
                nombre = COALESCE($2, nombre),
                rol = COALESCE($3, rol),
                org_unit_id = CASE WHEN $6 THEN $4 ELSE org_unit_id END,
                activo = COALESCE($5, activo)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.nombre)
        .bind(input.rol.map(|r| r.as_str()))
        .bind(input.org_unit_id.flatten())
        .bind(input.activo)
        .bind(input.org_unit_id.is_some())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
