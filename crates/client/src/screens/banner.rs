use std::time::{Duration, Instant};

/// How long a banner stays visible.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Banner {
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= BANNER_TTL
    }
}

/// Holds at most one banner; showing a new one replaces the old.
#[derive(Debug, Default)]
pub struct BannerSlot {
    current: Option<Banner>,
}

impl BannerSlot {
    pub fn success(&mut self, text: impl Into<String>) {
        self.show(BannerKind::Success, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.show(BannerKind::Error, text.into());
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The banner if it has not expired yet.
    pub fn visible_at(&self, now: Instant) -> Option<&Banner> {
        self.current.as_ref().filter(|b| !b.is_expired_at(now))
    }

    pub fn visible(&self) -> Option<&Banner> {
        self.visible_at(Instant::now())
    }

    fn show(&mut self, kind: BannerKind, text: String) {
        self.current = Some(Banner {
            kind,
            text,
            shown_at: Instant::now(),
        });
    }
}
