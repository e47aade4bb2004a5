//! Device inventory vocabulary and the specs mapping applied when a device
//! is registered.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Pc,
    Laptop,
    Impresora,
    Red,
    Otro,
}

impl DeviceType {
    pub const ALL: [DeviceType; 5] = [
        DeviceType::Pc,
        DeviceType::Laptop,
        DeviceType::Impresora,
        DeviceType::Red,
        DeviceType::Otro,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceType::Pc => "PC",
            DeviceType::Laptop => "LAPTOP",
            DeviceType::Impresora => "IMPRESORA",
            DeviceType::Red => "RED",
            DeviceType::Otro => "OTRO",
        }
    }
}

/// Lifecycle state of a device. The repair state keeps its accent on the
/// wire because existing rows store it that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceStatus {
    #[serde(rename = "ACTIVO")]
    Activo,
    #[serde(rename = "REPARACIÓN")]
    Reparacion,
    #[serde(rename = "RETIRADO")]
    Retirado,
}

impl DeviceStatus {
    pub const ALL: [DeviceStatus; 3] = [
        DeviceStatus::Activo,
        DeviceStatus::Reparacion,
        DeviceStatus::Retirado,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Activo => "ACTIVO",
            DeviceStatus::Reparacion => "REPARACIÓN",
            DeviceStatus::Retirado => "RETIRADO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceLogType {
    Asignacion,
    Mantenimiento,
    Reparacion,
    Backup,
    Otro,
}

impl DeviceLogType {
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceLogType::Asignacion => "ASIGNACION",
            DeviceLogType::Mantenimiento => "MANTENIMIENTO",
            DeviceLogType::Reparacion => "REPARACION",
            DeviceLogType::Backup => "BACKUP",
            DeviceLogType::Otro => "OTRO",
        }
    }
}

impl_text_enum!(DeviceType);
impl_text_enum!(DeviceStatus);
impl_text_enum!(DeviceLogType);

/// Name/serial pair for a keyboard or mouse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeripheralInfo {
    pub nombre: Option<String>,
    pub serial: Option<String>,
}

/// Hardware details captured by the device registration form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSpecsInput {
    pub procesador: Option<String>,
    pub procesador_velocidad: Option<String>,
    pub memoria_tipo: Option<String>,
    pub memoria_capacidad: Option<String>,
    pub disco_tipo: Option<String>,
    pub disco_capacidad: Option<String>,
    pub teclado: Option<PeripheralInfo>,
    pub mouse: Option<PeripheralInfo>,
}

/// Column values for a `device_specs` row, derived from [`DeviceSpecsInput`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecsRecord {
    pub cpu: Option<String>,
    pub cpu_velocidad: Option<String>,
    pub ram: Option<String>,
    pub ram_capacidad: Option<String>,
    pub disco: Option<String>,
    pub disco_capacidad: Option<String>,
    pub perifericos: Option<Value>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .filter(|v| !v.is_empty())
        .cloned()
}

fn peripheral_object(info: &Option<PeripheralInfo>) -> Option<Value> {
    let info = info.as_ref()?;
    let mut map = Map::new();
    if let Some(nombre) = non_blank(&info.nombre) {
        map.insert("nombre".into(), Value::String(nombre));
    }
    if let Some(serial) = non_blank(&info.serial) {
        map.insert("serial".into(), Value::String(serial));
    }
    if map.is_empty() {
        None
    } else {
        Some(Value::Object(map))
    }
}

/// Map form specs onto storage columns.
///
/// Blank strings are dropped, keyboard/mouse land under `perifericos`, and
/// `None` is returned when nothing remains to store.
pub fn build_specs_record(input: &DeviceSpecsInput) -> Option<SpecsRecord> {
    let mut perifericos = Map::new();
    if let Some(teclado) = peripheral_object(&input.teclado) {
        perifericos.insert("teclado".into(), teclado);
    }
    if let Some(mouse) = peripheral_object(&input.mouse) {
        perifericos.insert("mouse".into(), mouse);
    }

    let record = SpecsRecord {
        cpu: non_blank(&input.procesador),
        cpu_velocidad: non_blank(&input.procesador_velocidad),
        ram: non_blank(&input.memoria_tipo),
        ram_capacidad: non_blank(&input.memoria_capacidad),
        disco: non_blank(&input.disco_tipo),
        disco_capacidad: non_blank(&input.disco_capacidad),
        perifericos: (!perifericos.is_empty()).then_some(Value::Object(perifericos)),
    };

    if record == SpecsRecord::default() {
        None
    } else {
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keeps_accent_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&DeviceStatus::Reparacion).unwrap(),
            "\"REPARACIÓN\""
        );
        assert_eq!("REPARACIÓN".parse::<DeviceStatus>(), Ok(DeviceStatus::Reparacion));
        assert!("REPARACION".parse::<DeviceStatus>().is_err());
    }

    #[test]
    fn device_type_round_trips_through_text() {
        for ty in DeviceType::ALL {
            assert_eq!(ty.as_str().parse::<DeviceType>(), Ok(ty));
        }
    }

    #[test]
    fn empty_specs_produce_no_record() {
        let input = DeviceSpecsInput {
            procesador: Some(String::new()),
            teclado: Some(PeripheralInfo {
                nombre: Some(String::new()),
                serial: None,
            }),
            ..Default::default()
        };
        assert_eq!(build_specs_record(&input), None);
    }

    #[test]
    fn specs_are_mapped_to_columns() {
        let input = DeviceSpecsInput {
            procesador: Some("Core i5".into()),
            memoria_capacidad: Some("16 GB".into()),
            mouse: Some(PeripheralInfo {
                nombre: Some("Logitech".into()),
                serial: Some(String::new()),
            }),
            ..Default::default()
        };
        let record = build_specs_record(&input).expect("record");
        assert_eq!(record.cpu.as_deref(), Some("Core i5"));
        assert_eq!(record.ram_capacidad.as_deref(), Some("16 GB"));
        assert_eq!(record.ram, None);
        assert_eq!(
            record.perifericos,
            Some(serde_json::json!({"mouse": {"nombre": "Logitech"}}))
        );
    }
}
