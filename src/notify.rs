//! User-facing transient messages. Gameplay and screens report through the
//! `Notifier` trait; only the shell decides how a banner is drawn.

use std::time::{Duration, Instant};

pub const DEFAULT_BANNER_DURATION: Duration = Duration::from_millis(3500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity, duration: Duration);

    fn info(&mut self, message: &str) {
        self.notify(message, Severity::Info, DEFAULT_BANNER_DURATION);
    }

    fn success(&mut self, message: &str) {
        self.notify(message, Severity::Success, DEFAULT_BANNER_DURATION);
    }

    fn error(&mut self, message: &str) {
        self.notify(message, Severity::Error, DEFAULT_BANNER_DURATION);
    }
}

/// Holds the most recent banner. A newer message replaces the older one.
#[derive(Debug, Clone)]
pub struct BannerBoard {
    current: Option<Banner>,
    now: Instant,
}

impl BannerBoard {
    pub fn new(now: Instant) -> Self {
        Self { current: None, now }
    }

    /// Advance the board's clock and drop an expired banner.
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        if self.current.as_ref().is_some_and(|b| now > b.expires_at) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }
}

impl Notifier for BannerBoard {
    fn notify(&mut self, message: &str, severity: Severity, duration: Duration) {
        match severity {
            Severity::Error => log::warn!("banner: {}", message),
            _ => log::info!("banner: {}", message),
        }
        self.current = Some(Banner {
            message: message.to_string(),
            severity,
            expires_at: self.now + duration,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_expires_after_duration() {
        let t0 = Instant::now();
        let mut board = BannerBoard::new(t0);
        board.error("Wrong password.");
        board.tick(t0 + Duration::from_millis(3400));
        assert_eq!(board.current().map(|b| b.severity), Some(Severity::Error));
        board.tick(t0 + Duration::from_millis(3600));
        assert!(board.current().is_none());
    }

    #[test]
    fn newer_banner_replaces_older() {
        let t0 = Instant::now();
        let mut board = BannerBoard::new(t0);
        board.info("first");
        board.success("second");
        assert_eq!(board.current().unwrap().message, "second");
    }
}
