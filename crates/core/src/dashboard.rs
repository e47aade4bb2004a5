//! Dashboard aggregation over per-status counts.

use serde::{Deserialize, Serialize};

use crate::inventory::DeviceStatus;
use crate::ticket::TicketStatus;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetrics {
    pub total: i64,
    pub activos: i64,
    pub reparacion: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketMetrics {
    pub total: i64,
    pub abiertos: i64,
    pub en_proceso: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupMetrics {
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub dispositivos: DeviceMetrics,
    pub tickets: TicketMetrics,
    pub backups: BackupMetrics,
}

fn count_for(counts: &[(String, i64)], status: &str) -> i64 {
    counts
        .iter()
        .filter(|(s, _)| s == status)
        .map(|(_, n)| *n)
        .sum()
}

/// Summarize `(estado, count)` pairs for devices.
pub fn device_metrics(counts: &[(String, i64)]) -> DeviceMetrics {
    DeviceMetrics {
        total: counts.iter().map(|(_, n)| n).sum(),
        activos: count_for(counts, DeviceStatus::Activo.as_str()),
        reparacion: count_for(counts, DeviceStatus::Reparacion.as_str()),
    }
}

/// Summarize `(estado, count)` pairs for tickets.
pub fn ticket_metrics(counts: &[(String, i64)]) -> TicketMetrics {
    TicketMetrics {
        total: counts.iter().map(|(_, n)| n).sum(),
        abiertos: count_for(counts, TicketStatus::Abierto.as_str()),
        en_proceso: count_for(counts, TicketStatus::EnProceso.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, i64)]) -> Vec<(String, i64)> {
        items.iter().map(|(s, n)| (s.to_string(), *n)).collect()
    }

    #[test]
    fn device_counts_by_state() {
        let m = device_metrics(&pairs(&[("ACTIVO", 7), ("REPARACIÓN", 2), ("RETIRADO", 1)]));
        assert_eq!(
            m,
            DeviceMetrics {
                total: 10,
                activos: 7,
                reparacion: 2
            }
        );
    }

    #[test]
    fn ticket_counts_by_state() {
        let m = ticket_metrics(&pairs(&[("ABIERTO", 3), ("EN_PROCESO", 1), ("CERRADO", 4)]));
        assert_eq!(m.total, 8);
        assert_eq!(m.abiertos, 3);
        assert_eq!(m.en_proceso, 1);
    }

    #[test]
    fn empty_counts_are_zero() {
        assert_eq!(device_metrics(&[]), DeviceMetrics::default());
    }
}
