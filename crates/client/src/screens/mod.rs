//! Admin screen state.
//!
//! A screen owns its fetched list, its form state and a single banner.
//! Every mutation re-fetches the full list; nothing is patched locally.

pub mod backups;
pub mod banner;
pub mod devices;
pub mod permissions;
pub mod users;

pub use backups::BackupsScreen;
pub use banner::{Banner, BannerKind, BannerSlot, BANNER_TTL};
pub use devices::DevicesScreen;
pub use permissions::PermissionsScreen;
pub use users::UsersScreen;

use crate::error::ClientError;

/// Result of a user action on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do; no request was sent.
    Skipped,
    Done,
    /// The banner holds the error.
    Failed,
}

/// The error's own message, or `fallback` when it has none.
pub(crate) fn error_text(err: &ClientError, fallback: &str) -> String {
    let text = err.to_string();
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}
