//! Transient status messages.
//!
//! The host calls [`Toast::tick`] from its event loop; the message disappears
//! once its deadline has passed. There is only ever one deadline: a newer
//! message replaces the old one and restarts the countdown.

use std::time::{Duration, Instant};

pub const COPIED: &str = "QR copied!";
pub const COPY_FAILED: &str = "Copy failed!";
pub const COPY_FAILED_NO_DATA: &str = "Copy failed - no image data!";
pub const COPY_FAILED_NO_CANVAS: &str = "Copy failed - no canvas!";
pub const NOTHING_TO_COPY: &str = "No QR code to copy!";
pub const DOWNLOAD_FAILED: &str = "Download failed!";

#[derive(Debug, Clone)]
pub struct Toast {
    duration: Duration,
    message: Option<String>,
    deadline: Option<Instant>,
}

impl Toast {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            message: None,
            deadline: None,
        }
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.show_at(message, Instant::now());
    }

    /// Shows `message` as of `now`, cancelling any pending hide.
    pub fn show_at(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::debug!(%message, "toast");
        self.message = Some(message);
        self.deadline = Some(now + self.duration);
    }

    /// Hides the message once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.deadline.is_some_and(|deadline| now >= deadline) {
            self.dismiss();
        }
    }

    /// Hides the message and cancels its timer.
    pub fn dismiss(&mut self) {
        self.message = None;
        self.deadline = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for Toast {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}
