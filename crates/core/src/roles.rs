//! Staff roles and the normalization applied to role strings coming from the
//! identity service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of roles a user may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Docente,
    Administrativo,
    Ti,
    Director,
    LiderTi,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Docente,
        Role::Administrativo,
        Role::Ti,
        Role::Director,
        Role::LiderTi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Docente => "DOCENTE",
            Role::Administrativo => "ADMINISTRATIVO",
            Role::Ti => "TI",
            Role::Director => "DIRECTOR",
            Role::LiderTi => "LIDER_TI",
        }
    }

    /// Human label used by the admin screens.
    pub fn label(self) -> &'static str {
        match self {
            Role::Docente => "Docente",
            Role::Administrativo => "Administrativo",
            Role::Ti => "Equipo TI",
            Role::Director => "Director",
            Role::LiderTi => "Líder TI",
        }
    }

    /// Leniently parse a role as stored by the identity service
    /// (`"director"`, `"Líder TI"`, `"lider-ti"` ...).
    pub fn normalize(raw: &str) -> Option<Role> {
        normalize_role_value(raw).and_then(|n| n.parse().ok())
    }

    /// The IT lead sees every org unit and passes every role check.
    pub fn is_it_lead(self) -> bool {
        self == Role::LiderTi
    }

    /// Roles that may manage inventory without a delegated grant.
    pub fn manages_inventory(self) -> bool {
        matches!(self, Role::Ti | Role::LiderTi)
    }

    /// Roles allowed to read any ticket.
    pub fn reads_all_tickets(self) -> bool {
        matches!(self, Role::Ti | Role::LiderTi | Role::Director)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a string is not exactly one of the role names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Normalize a raw role string.
///
/// Accents are removed, the value is trimmed and upper-cased, `-` and spaces
/// become `_`, and runs of `_` collapse to one. Returns `None` when nothing
/// is left.
pub fn normalize_role_value(raw: &str) -> Option<String> {
    let folded: String = raw.chars().map(fold_accent).collect();
    let upper = folded.trim().to_uppercase().replace(['-', ' '], "_");

    let mut normalized = String::with_capacity(upper.len());
    for ch in upper.chars() {
        if ch == '_' && normalized.ends_with('_') {
            continue;
        }
        normalized.push(ch);
    }

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => 'A',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'O',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}
