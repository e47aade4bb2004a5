//! Input rules shared by the admin API, the registration route and the
//! client-side forms.

use std::sync::LazyLock;

use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MIN_NOMBRE_LENGTH: usize = 2;
pub const MAX_NOMBRE_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 255;
pub const MAX_NOTES_LENGTH: usize = 500;

/// Strict address shape used for staff accounts and inventory grants.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("valid regex")
});

/// Loose `something@something.something` shape accepted by self-registration.
static LOOSE_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Trim and lower-case an email. Blank input yields `None`.
pub fn normalize_email(value: &str) -> Option<String> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LENGTH && EMAIL_RE.is_match(email)
}

pub fn is_plausible_email(email: &str) -> bool {
    LOOSE_EMAIL_RE.is_match(email)
}

/// Normalize and validate an email in one step.
pub fn normalized_valid_email(value: &str) -> Option<String> {
    normalize_email(value).filter(|e| is_valid_email(e))
}

/// Trim a display name and check its length.
pub fn validate_nombre(value: &str) -> Result<String, String> {
    let cleaned = value.trim();
    let len = cleaned.chars().count();
    if len < MIN_NOMBRE_LENGTH {
        return Err("El nombre debe tener al menos 2 caracteres".into());
    }
    if len > MAX_NOMBRE_LENGTH {
        return Err(format!(
            "El nombre no puede superar {MAX_NOMBRE_LENGTH} caracteres"
        ));
    }
    Ok(cleaned.to_string())
}

/// Check a password against the length bounds.
pub fn validate_password(password: &str) -> Result<(), String> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "La contraseña debe tener al menos {MIN_PASSWORD_LENGTH} caracteres"
        ));
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "La contraseña no puede superar {MAX_PASSWORD_LENGTH} caracteres"
        ));
    }
    Ok(())
}
