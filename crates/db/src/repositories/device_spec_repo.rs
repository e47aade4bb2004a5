//! Repository for the `device_specs` table.

use gemelli_core::inventory::SpecsRecord;
use gemelli_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::device_spec::DeviceSpecs;

const COLUMNS: &str = "device_id, cpu, cpu_velocidad, ram, ram_capacidad, disco, disco_capacidad, \
                       os, licencias, red, perifericos, otros";

pub struct DeviceSpecRepo;

impl DeviceSpecRepo {
    pub async fn create<'e, E>(
        executor: E,
        device_id: DbId,
        record: &SpecsRecord,
    ) -> Result<DeviceSpecs, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO device_specs (device_id, cpu, cpu_velocidad, ram, ram_capacidad, \
                                       disco, disco_capacidad, perifericos)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceSpecs>(&query)
            .bind(device_id)
            .bind(&record.cpu)
            .bind(&record.cpu_velocidad)
            .bind(&record.ram)
            .bind(&record.ram_capacidad)
            .bind(&record.disco)
            .bind(&record.disco_capacidad)
            .bind(&record.perifericos)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_device(
        pool: &PgPool,
        device_id: DbId,
    ) -> Result<Option<DeviceSpecs>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM device_specs WHERE device_id = $1");
        sqlx::query_as::<_, DeviceSpecs>(&query)
            .bind(device_id)
            .fetch_optional(pool)
            .await
    }
}
