//! Aggregate counts for the dashboard.

use gemelli_core::dashboard::{device_metrics, ticket_metrics, BackupMetrics, DashboardMetrics};
use gemelli_core::scope::OrgScope;
use sqlx::PgPool;

use crate::repositories::BackupRepo;

pub struct DashboardRepo;

impl DashboardRepo {
    /// `(estado, count)` pairs for devices visible in `scope`.
    pub async fn device_status_counts(
        pool: &PgPool,
        scope: OrgScope,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT estado, COUNT(*) FROM devices
             WHERE ($1::boolean OR org_unit_id = $2::uuid)
             GROUP BY estado",
        )
        .bind(scope.is_all())
        .bind(scope.unit())
        .fetch_all(pool)
        .await
    }

    /// `(estado, count)` pairs for tickets visible in `scope`.
    pub async fn ticket_status_counts(
        pool: &PgPool,
        scope: OrgScope,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT estado, COUNT(*) FROM tickets
             WHERE ($1::boolean OR org_unit_id = $2::uuid)
             GROUP BY estado",
        )
        .bind(scope.is_all())
        .bind(scope.unit())
        .fetch_all(pool)
        .await
    }

    /// Device and ticket totals within `scope`; the backup total is global.
    pub async fn metrics(pool: &PgPool, scope: OrgScope) -> Result<DashboardMetrics, sqlx::Error> {
        let devices = Self::device_status_counts(pool, scope).await?;
        let tickets = Self::ticket_status_counts(pool, scope).await?;
        let backups = BackupRepo::count(pool).await?;

        Ok(DashboardMetrics {
            dispositivos: device_metrics(&devices),
            tickets: ticket_metrics(&tickets),
            backups: BackupMetrics { total: backups },
        })
    }
}
