//! Repository for the `devices` table.
//!
//! Reads and updates take an [`OrgScope`]; callers outside the IT lead role
//! only ever touch rows of their own org unit.

use gemelli_core::scope::OrgScope;
use gemelli_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::device::{CreateDevice, Device, DeviceFilter, DeviceWithHolder, UpdateDevice};

const COLUMNS: &str = "id, nombre, tipo, estado, usuario_actual_id, ubicacion, imagen, notas, \
                       serial, marca, modelo, org_unit_id, creado_por, fecha_ingreso, actualizado_en";

/// [`COLUMNS`] qualified with the `d` alias.
const D_COLUMNS: &str = "d.id, d.nombre, d.tipo, d.estado, d.usuario_actual_id, d.ubicacion, \
                         d.imagen, d.notas, d.serial, d.marca, d.modelo, d.org_unit_id, \
                         d.creado_por, d.fecha_ingreso, d.actualizado_en";

pub struct DeviceRepo;

impl DeviceRepo {
    pub async fn create<'e, E>(executor: E, input: &CreateDevice) -> Result<Device, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO devices (nombre, tipo, estado, usuario_actual_id, ubicacion, imagen, \
                                  notas, serial, marca, modelo, org_unit_id, creado_por, fecha_ingreso)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(&input.nombre)
            .bind(input.tipo.as_str())
            .bind(input.estado.as_str())
            .bind(input.usuario_actual_id)
            .bind(&input.ubicacion)
            .bind(&input.imagen)
            .bind(&input.notas)
            .bind(&input.serial)
            .bind(&input.marca)
            .bind(&input.modelo)
            .bind(input.org_unit_id)
            .bind(input.creado_por)
            .bind(input.fecha_ingreso)
            .fetch_one(executor)
            .await
    }

    /// List devices visible in `filter.scope`, with the current holder.
    pub async fn list(
        pool: &PgPool,
        filter: &DeviceFilter,
    ) -> Result<Vec<DeviceWithHolder>, sqlx::Error> {
        let query = format!(
            "SELECT {D_COLUMNS},
                    CASE WHEN u.id IS NULL THEN NULL
                         ELSE json_build_object('nombre', u.nombre, 'email', u.email)
                    END AS usuario_actual
             FROM devices d
             LEFT JOIN users u ON u.id = d.usuario_actual_id
             WHERE ($1::boolean OR d.org_unit_id = $2::uuid)
               AND ($3::text IS NULL OR d.estado = $3)
               AND ($4::text IS NULL OR d.tipo = $4)
             ORDER BY d.nombre"
        );
        sqlx::query_as::<_, DeviceWithHolder>(&query)
            .bind(filter.scope.is_all())
            .bind(filter.scope.unit())
            .bind(filter.estado.map(|e| e.as_str()))
            .bind(filter.tipo.map(|t| t.as_str()))
            .fetch_all(pool)
            .await
    }

    pub async fn find_scoped(
        pool: &PgPool,
        id: DbId,
        scope: OrgScope,
    ) -> Result<Option<Device>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM devices
             WHERE id = $1 AND ($2::boolean OR org_unit_id = $3::uuid)"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .bind(scope.is_all())
            .bind(scope.unit())
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update and stamp `actualizado_en`.
    ///
    /// Returns `None` if the device does not exist within `scope`.
    pub async fn update_scoped<'e, E>(
        executor: E,
        id: DbId,
        scope: OrgScope,
        input: &UpdateDevice,
    ) -> Result<Option<Device>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE devices SET
                nombre = COALESCE($4, nombre),
                estado = COALESCE($5, estado),
                usuario_actual_id = COALESCE($6, usuario_actual_id),
                ubicacion = COALESCE($7, ubicacion),
                notas = COALESCE($8, notas),
                imagen = COALESCE($9, imagen),
                serial = COALESCE($10, serial),
                marca = COALESCE($11, marca),
                modelo = COALESCE($12, modelo),
                actualizado_en = NOW()
             WHERE id = $1 AND ($2::boolean OR org_unit_id = $3::uuid)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .bind(scope.is_all())
            .bind(scope.unit())
            .bind(&input.nombre)
            .bind(input.estado.map(|e| e.as_str()))
            .bind(input.usuario_actual_id)
            .bind(&input.ubicacion)
            .bind(&input.notas)
            .bind(&input.imagen)
            .bind(&input.serial)
            .bind(&input.marca)
            .bind(&input.modelo)
            .fetch_optional(executor)
            .await
    }
}
