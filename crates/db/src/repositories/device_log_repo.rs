//! Repository for the `device_logs` table.

use gemelli_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::device_log::{CreateDeviceLog, DeviceLog, DeviceLogEntry};

const COLUMNS: &str = "id, device_id, tipo, descripcion, realizado_por, fecha";

pub struct DeviceLogRepo;

impl DeviceLogRepo {
    pub async fn create<'e, E>(executor: E, input: &CreateDeviceLog) -> Result<DeviceLog, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO device_logs (device_id, tipo, descripcion, realizado_por)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceLog>(&query)
            .bind(input.device_id)
            .bind(input.tipo.as_str())
            .bind(&input.descripcion)
            .bind(input.realizado_por)
            .fetch_one(executor)
            .await
    }

    /// History of a device, newest first, with the author's name.
    pub async fn list_for_device(
        pool: &PgPool,
        device_id: DbId,
    ) -> Result<Vec<DeviceLogEntry>, sqlx::Error> {
        sqlx::query_as::<_, DeviceLogEntry>(
            "SELECT l.id, l.device_id, l.tipo, l.descripcion, l.realizado_por, l.fecha,
                    CASE WHEN u.id IS NULL THEN NULL
                         ELSE json_build_object('nombre', u.nombre)
                    END AS usuario
             FROM device_logs l
             LEFT JOIN users u ON u.id = l.realizado_por
             WHERE l.device_id = $1
             ORDER BY l.fecha DESC",
        )
        .bind(device_id)
        .fetch_all(pool)
        .await
    }
}
