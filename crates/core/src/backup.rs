//! Backup kinds and storage targets.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackupType {
    Incremental,
    Completa,
    Diferencial,
}

impl BackupType {
    pub fn as_str(self) -> &'static str {
        match self {
            BackupType::Incremental => "INCREMENTAL",
            BackupType::Completa => "COMPLETA",
            BackupType::Diferencial => "DIFERENCIAL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BackupType::Incremental => "Incremental",
            BackupType::Completa => "Completa",
            BackupType::Diferencial => "Diferencial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageKind {
    Nube,
    Local,
    Hibrido,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Nube => "NUBE",
            StorageKind::Local => "LOCAL",
            StorageKind::Hibrido => "HIBRIDO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StorageKind::Nube => "Nube",
            StorageKind::Local => "Local",
            StorageKind::Hibrido => "Híbrido",
        }
    }
}

impl_text_enum!(BackupType);
impl_text_enum!(StorageKind);
