//! Email dispatch contract and the log-backed stand-in.

use crate::logging::{sanitize_message, MAX_LOGGED_TEXT_CHARS};
use log::info;

/// Fire-and-forget email delivery. Failures are the adapter's concern.
pub trait EmailDispatchService: Send + Sync {
    fn send(&self, recipient_email: &str, subject: &str, body: &str);
}

/// Records each dispatch as one log line instead of sending mail.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmailDispatcher;

impl EmailDispatchService for LogEmailDispatcher {
    fn send(&self, recipient_email: &str, subject: &str, body: &str) {
        info!(
            "event=email_dispatch module=notify status=ok to={} subject={:?} body={:?}",
            recipient_email,
            sanitize_message(subject, MAX_LOGGED_TEXT_CHARS),
            sanitize_message(body, MAX_LOGGED_TEXT_CHARS)
        );
    }
}
