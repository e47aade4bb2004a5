//! Inventory permission grants screen.

use uuid::Uuid;

use super::{error_text, BannerSlot, Outcome};
use crate::api::{InventoryPermission, PermissionCheck};
use crate::client::ApiClient;

pub struct PermissionsScreen {
    api: ApiClient,
    pub grants: Vec<InventoryPermission>,
    /// Whether the current user may manage inventory, once checked.
    pub check: Option<PermissionCheck>,
    pub banner: BannerSlot,
    pub busy: Option<Uuid>,
}

impl PermissionsScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            grants: Vec::new(),
            check: None,
            banner: BannerSlot::default(),
            busy: None,
        }
    }

    pub async fn load(&mut self) {
        match self.api.inventory_permissions().list().await {
            Ok(grants) => self.grants = grants,
            Err(e) => self
                .banner
                .error(error_text(&e, "No se pudieron cargar los permisos.")),
        }
    }

    pub async fn refresh_check(&mut self) {
        match self.api.inventory_permissions().check().await {
            Ok(check) => self.check = Some(check),
            Err(e) => {
                self.check = None;
                self.banner
                    .error(error_text(&e, "No se pudo verificar el permiso."));
            }
        }
    }

    pub async fn grant(&mut self, email: &str, notes: Option<&str>) -> Outcome {
        self.banner.clear();
        let email = email.trim();
        if email.is_empty() {
            self.banner.error("El email es requerido.");
            return Outcome::Failed;
        }
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());
        match self.api.inventory_permissions().create(email, notes).await {
            Ok(_) => {
                self.banner.success("Permiso otorgado correctamente.");
                self.load().await;
                Outcome::Done
            }
            Err(e) => {
                self.banner
                    .error(error_text(&e, "No se pudo otorgar el permiso."));
                Outcome::Failed
            }
        }
    }

    pub async fn revoke(&mut self, id: Uuid) -> Outcome {
        self.busy = Some(id);
        self.banner.clear();
        let outcome = match self.api.inventory_permissions().remove(id).await {
            Ok(()) => {
                self.banner.success("Permiso revocado correctamente.");
                self.load().await;
                Outcome::Done
            }
            Err(e) => {
                self.banner
                    .error(error_text(&e, "No se pudo revocar el permiso."));
                Outcome::Failed
            }
        };
        self.busy = None;
        outcome
    }
}
