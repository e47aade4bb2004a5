//! Repository for the `backups` table.

use gemelli_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::backup::{Backup, BackupWithDevice, CreateBackup};

const COLUMNS: &str = "id, device_id, tipo, almacenamiento, frecuencia, fecha_backup, \
                       evidencia_url, notas, realizado_por";

pub struct BackupRepo;

impl BackupRepo {
    /// Record a backup performed now.
    pub async fn create<'e, E>(executor: E, input: &CreateBackup) -> Result<Backup, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO backups (device_id, tipo, almacenamiento, frecuencia, evidencia_url, \
                                  notas, realizado_por, fecha_backup)
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Backup>(&query)
            .bind(input.device_id)
            .bind(input.tipo.as_str())
            .bind(input.almacenamiento.as_str())
            .bind(&input.frecuencia)
            .bind(&input.evidencia_url)
            .bind(&input.notas)
            .bind(input.realizado_por)
            .fetch_one(executor)
            .await
    }

    /// Newest first, optionally for one device, with the device's name and type.
    pub async fn list(
        pool: &PgPool,
        device_id: Option<DbId>,
    ) -> Result<Vec<BackupWithDevice>, sqlx::Error> {
        sqlx::query_as::<_, BackupWithDevice>(
            "SELECT b.id, b.device_id, b.tipo, b.almacenamiento, b.frecuencia, b.fecha_backup,
                    b.evidencia_url, b.notas, b.realizado_por,
                    CASE WHEN d.id IS NULL THEN NULL
                         ELSE json_build_object('nombre', d.nombre, 'tipo', d.tipo)
                    END AS device
             FROM backups b
             LEFT JOIN devices d ON d.id = b.device_id
             WHERE ($1::uuid IS NULL OR b.device_id = $1)
             ORDER BY b.fecha_backup DESC",
        )
        .bind(device_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_for_device(pool: &PgPool, device_id: DbId) -> Result<Vec<Backup>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM backups WHERE device_id = $1 ORDER BY fecha_backup DESC"
        );
        sqlx::query_as::<_, Backup>(&query)
            .bind(device_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM backups")
            .fetch_one(pool)
            .await
    }
}
