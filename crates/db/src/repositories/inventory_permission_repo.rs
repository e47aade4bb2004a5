//! Repository for the `inventory_access_grants` table.

use gemelli_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::inventory_permission::{
    CreateInventoryPermission, InventoryPermission, InventoryPermissionWithGranter,
};

const COLUMNS: &str = "id, email, notes, granted_at, granted_by";

pub struct InventoryPermissionRepo;

impl InventoryPermissionRepo {
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateInventoryPermission,
    ) -> Result<InventoryPermission, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO inventory_access_grants (email, notes, granted_by, granted_at)
             VALUES ($1, $2, $3, NOW())
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryPermission>(&query)
            .bind(&input.email)
            .bind(&input.notes)
            .bind(input.granted_by)
            .fetch_one(executor)
            .await
    }

    /// Find the grant for an already-normalized email.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<InventoryPermission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory_access_grants WHERE email = $1");
        sqlx::query_as::<_, InventoryPermission>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InventoryPermission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory_access_grants WHERE id = $1");
        sqlx::query_as::<_, InventoryPermission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All grants ordered by email, with the granter's name and email.
    pub async fn list(pool: &PgPool) -> Result<Vec<InventoryPermissionWithGranter>, sqlx::Error> {
        sqlx::query_as::<_, InventoryPermissionWithGranter>(
            "SELECT g.id, g.email, g.notes, g.granted_at, g.granted_by,
                    CASE WHEN u.id IS NULL THEN NULL
                         ELSE json_build_object('nombre', u.nombre, 'email', u.email)
                    END AS granted_by_user
             FROM inventory_access_grants g
             LEFT JOIN users u ON u.id = g.granted_by
             ORDER BY g.email ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM inventory_access_grants WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
