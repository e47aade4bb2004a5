//! Backup history screen.

use uuid::Uuid;

use super::{error_text, BannerSlot, Outcome};
use crate::api::{Backup, NewBackup};
use crate::client::ApiClient;

pub struct BackupsScreen {
    api: ApiClient,
    /// Newest first.
    pub items: Vec<Backup>,
    pub device_filter: Option<Uuid>,
    pub banner: BannerSlot,
    pub loading: bool,
}

impl BackupsScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            items: Vec::new(),
            device_filter: None,
            banner: BannerSlot::default(),
            loading: false,
        }
    }

    pub async fn load(&mut self) {
        self.loading = true;
        match self.api.backups().list(self.device_filter).await {
            Ok(mut items) => {
                items.sort_by(|a, b| b.fecha_backup.cmp(&a.fecha_backup));
                self.items = items;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Loading backups failed");
                self.banner
                    .error(error_text(&e, "No se pudieron cargar los backups."));
            }
        }
        self.loading = false;
    }

    pub async fn record(&mut self, input: &NewBackup) -> Outcome {
        self.banner.clear();
        match self.api.backups().create(input).await {
            Ok(backup) => {
                tracing::info!(backup_id = %backup.id, "Backup recorded");
                self.banner.success("Backup registrado correctamente.");
                self.load().await;
                Outcome::Done
            }
            Err(e) => {
                self.banner
                    .error(error_text(&e, "No se pudo registrar el backup."));
                Outcome::Failed
            }
        }
    }
}
