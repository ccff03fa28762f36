//! Notification sink that writes to the `tracing` subscriber.
//!
//! Used by the command line front end, where there is no toast surface. Each
//! notification becomes one event whose level follows the severity.

use std::time::Duration;

use tracing::{error, info, warn};

use super::{AutoClose, Notification, NotificationSink, Severity};

/// Default auto-dismiss duration of a notification surface.
pub const DEFAULT_AUTO_CLOSE: Duration = Duration::from_millis(6000);

#[derive(Debug, Clone)]
pub struct TracingSink {
    default_auto_close: Duration,
}

impl TracingSink {
    pub fn new(default_auto_close: Duration) -> Self {
        Self { default_auto_close }
    }

    fn dismiss_after_ms(&self, auto_close: AutoClose) -> Option<u64> {
        match auto_close {
            AutoClose::Default => Some(self.default_auto_close.as_millis() as u64),
            AutoClose::Never => None,
        }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_CLOSE)
    }
}

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        let dismiss_after_ms = self.dismiss_after_ms(notification.auto_close);
        let severity = notification.severity;
        let text = notification.message.text();
        match severity {
            Severity::Success | Severity::Info => {
                info!(%severity, ?dismiss_after_ms, "{text}")
            }
            Severity::Warning => warn!(%severity, ?dismiss_after_ms, "{text}"),
            Severity::Error => error!(%severity, ?dismiss_after_ms, "{text}"),
        }
    }
}
