//! Repository for the `org_units` lookup table.

use gemelli_core::types::DbId;
use sqlx::PgPool;

use crate::models::org_unit::OrgUnit;

pub struct OrgUnitRepo;

impl OrgUnitRepo {
    pub async fn create(pool: &PgPool, nombre: &str) -> Result<OrgUnit, sqlx::Error> {
        sqlx::query_as::<_, OrgUnit>("INSERT INTO org_units (nombre) VALUES ($1) RETURNING id, nombre")
            .bind(nombre)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OrgUnit>, sqlx::Error> {
        sqlx::query_as::<_, OrgUnit>("SELECT id, nombre FROM org_units WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<OrgUnit>, sqlx::Error> {
        sqlx::query_as::<_, OrgUnit>("SELECT id, nombre FROM org_units ORDER BY nombre")
            .fetch_all(pool)
            .await
    }
}
