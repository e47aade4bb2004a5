//! Device inventory screen.

use gemelli_core::inventory::{DeviceStatus, DeviceType};
use uuid::Uuid;

use super::{error_text, BannerSlot, Outcome};
use crate::api::{Device, DeviceChanges, DeviceQuery, NewDevice};
use crate::client::ApiClient;

/// Edit form for the selected device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceForm {
    pub nombre: String,
    pub estado: DeviceStatus,
    pub ubicacion: String,
    pub notas: String,
}

impl Default for DeviceForm {
    fn default() -> Self {
        Self {
            nombre: String::new(),
            estado: DeviceStatus::Activo,
            ubicacion: String::new(),
            notas: String::new(),
        }
    }
}

impl From<&Device> for DeviceForm {
    fn from(device: &Device) -> Self {
        Self {
            nombre: device.nombre.clone(),
            estado: device.estado,
            ubicacion: device.ubicacion.clone(),
            notas: device.notas.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDeviceForm {
    pub nombre: String,
    pub tipo: DeviceType,
    pub estado: DeviceStatus,
    pub ubicacion: String,
    pub notas: String,
}

impl Default for NewDeviceForm {
    fn default() -> Self {
        Self {
            nombre: String::new(),
            tipo: DeviceType::Pc,
            estado: DeviceStatus::Activo,
            ubicacion: String::new(),
            notas: String::new(),
        }
    }
}

/// Blank notes are sent as `null`.
fn notes_or_none(notas: &str) -> Option<String> {
    if notas.trim().is_empty() {
        None
    } else {
        Some(notas.to_string())
    }
}

pub struct DevicesScreen {
    api: ApiClient,
    pub devices: Vec<Device>,
    /// Matched against `nombre` and `ubicacion`, case-insensitively.
    pub search: String,
    /// `None` shows every estado.
    pub estado_filter: Option<DeviceStatus>,
    pub selected: Option<Uuid>,
    pub form: DeviceForm,
    pub create_form: NewDeviceForm,
    pub banner: BannerSlot,
    pub saving: bool,
    pub creating: bool,
}

impl DevicesScreen {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            devices: Vec::new(),
            search: String::new(),
            estado_filter: None,
            selected: None,
            form: DeviceForm::default(),
            create_form: NewDeviceForm::default(),
            banner: BannerSlot::default(),
            saving: false,
            creating: false,
        }
    }

    /// Fetch the list; the edit form follows the selected device's fresh row.
    pub async fn load(&mut self) {
        match self.api.devices().list(&DeviceQuery::default()).await {
            Ok(devices) => {
                self.devices = devices;
                let refreshed = self
                    .selected
                    .and_then(|id| self.device(id))
                    .map(DeviceForm::from);
                if let Some(form) = refreshed {
                    self.form = form;
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Loading devices failed");
                self.banner.error("No se pudieron cargar los dispositivos.");
            }
        }
    }

    pub fn device(&self, id: Uuid) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn filtered(&self) -> Vec<&Device> {
        let term = self.search.to_lowercase();
        self.devices
            .iter()
            .filter(|d| {
                d.nombre.to_lowercase().contains(&term)
                    || d.ubicacion.to_lowercase().contains(&term)
            })
            .filter(|d| self.estado_filter.map_or(true, |estado| d.estado == estado))
            .collect()
    }

    /// Put a device into the edit form.
    pub fn select(&mut self, id: Uuid) -> bool {
        let Some(form) = self.device(id).map(DeviceForm::from) else {
            return false;
        };
        self.selected = Some(id);
        self.form = form;
        self.banner.clear();
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.form = DeviceForm::default();
        self.banner.clear();
    }

    pub async fn update_selected(&mut self) -> Outcome {
        let Some(id) = self.selected else {
            return Outcome::Skipped;
        };
        let changes = DeviceChanges {
            nombre: Some(self.form.nombre.clone()),
            estado: Some(self.form.estado),
            ubicacion: Some(self.form.ubicacion.clone()),
            notas: notes_or_none(&self.form.notas),
        };

        self.saving = true;
        self.banner.clear();
        let result = self.api.devices().update(id, &changes).await;
        let outcome = match result {
            Ok(_) => {
                self.banner.success("Dispositivo actualizado correctamente.");
                self.load().await;
                Outcome::Done
            }
            Err(e) => {
                self.banner
                    .error(error_text(&e, "No se pudo actualizar el dispositivo."));
                Outcome::Failed
            }
        };
        self.saving = false;
        outcome
    }

    /// Create from `create_form` and select the new device.
    pub async fn create(&mut self) -> Outcome {
        let form = &self.create_form;
        let input = NewDevice {
            nombre: form.nombre.clone(),
            tipo: form.tipo,
            estado: form.estado,
            ubicacion: form.ubicacion.clone(),
            notas: notes_or_none(&form.notas),
            serial: None,
            marca: None,
            modelo: None,
            specs: None,
        };
        self.create_with(input).await
    }

    /// Create a fully specified device and select it.
    pub async fn create_with(&mut self, input: NewDevice) -> Outcome {
        self.creating = true;
        self.banner.clear();
        let result = self.api.devices().create(&input).await;
        let outcome = match result {
            Ok(device) => {
                self.banner.success("Dispositivo creado correctamente.");
                self.create_form = NewDeviceForm::default();
                self.selected = Some(device.id);
                self.form = DeviceForm::from(&device);
                self.load().await;
                Outcome::Done
            }
            Err(e) => {
                self.banner
                    .error(error_text(&e, "No se pudo crear el dispositivo."));
                Outcome::Failed
            }
        };
        self.creating = false;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_notes_become_none() {
        assert_eq!(notes_or_none("   "), None);
        assert_eq!(notes_or_none(" cable nuevo "), Some(" cable nuevo ".to_string()));
    }
}
