//! # Notifications
//!
//! Delivery of user-facing messages to a [`NotificationSink`].
//!
//! The [`Notifier`] offers one entry point per [`Severity`]. Each accepts a
//! single message or a list of messages plus [`NotifyOptions`]:
//!
//! - A [`Message::List`] is flattened one level (inner lists are concatenated)
//!   and every element becomes its own notification, in order.
//! - A [`Message::Failure`] (an error value) skips list handling and is
//!   delivered as its string form.
//! - `auto_hide: Some(true)` maps to [`AutoClose::Default`], the sink's default
//!   duration. Anything else maps to [`AutoClose::Never`]. There is no custom
//!   duration.

pub mod tracing_sink;

pub use tracing_sink::TracingSink;

use std::fmt;
use std::sync::Arc;

use crate::framework::ActionError;

/// Notification severity, one per notifier entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Warning,
    Error,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Info => "info",
        })
    }
}

/// Auto-dismiss policy handed to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoClose {
    /// Dismiss after the sink's default duration.
    Default,
    /// Stay until the user dismisses it.
    Never,
}

impl AutoClose {
    pub fn from_auto_hide(auto_hide: Option<bool>) -> Self {
        if auto_hide == Some(true) {
            AutoClose::Default
        } else {
            AutoClose::Never
        }
    }
}

/// Per-call options. The default hides automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyOptions {
    pub auto_hide: Option<bool>,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            auto_hide: Some(true),
        }
    }
}

impl NotifyOptions {
    /// Options for a message that stays until dismissed.
    pub fn persistent() -> Self {
        Self {
            auto_hide: Some(false),
        }
    }
}

/// Content of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Text(String),
    List(Vec<Message>),
    /// An error, already rendered to its string form.
    Failure(String),
}

impl Message {
    pub fn failure(err: &dyn std::error::Error) -> Self {
        Message::Failure(err.to_string())
    }

    /// Plain-text rendering; list items go on separate lines.
    pub fn text(&self) -> String {
        match self {
            Message::Text(text) | Message::Failure(text) => text.clone(),
            Message::List(items) => items
                .iter()
                .map(Message::text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl<T: Into<Message>> From<Vec<T>> for Message {
    fn from(items: Vec<T>) -> Self {
        Message::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<&ActionError> for Message {
    fn from(err: &ActionError) -> Self {
        match err {
            ActionError::BadRequest { messages, errors } => Message::List(
                messages
                    .iter()
                    .cloned()
                    .map(Message::Text)
                    .chain(
                        errors
                            .iter()
                            .map(|(field, error)| Message::Text(format!("{field}: {error}"))),
                    )
                    .collect(),
            ),
            other => Message::Text(other.to_string()),
        }
    }
}

/// One delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: Message,
    pub auto_close: AutoClose,
}

/// Display surface for notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Front end over a [`NotificationSink`].
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    pub fn success(&self, message: impl Into<Message>, options: NotifyOptions) {
        self.show(Severity::Success, message.into(), options);
    }

    pub fn warning(&self, message: impl Into<Message>, options: NotifyOptions) {
        self.show(Severity::Warning, message.into(), options);
    }

    pub fn error(&self, message: impl Into<Message>, options: NotifyOptions) {
        self.show(Severity::Error, message.into(), options);
    }

    pub fn info(&self, message: impl Into<Message>, options: NotifyOptions) {
        self.show(Severity::Info, message.into(), options);
    }

    /// Shows a failed action at error severity.
    pub fn report(&self, err: &ActionError) {
        self.error(err, NotifyOptions::default());
    }

    fn show(&self, severity: Severity, message: Message, options: NotifyOptions) {
        let auto_close = AutoClose::from_auto_hide(options.auto_hide);
        let deliver = |message: Message| {
            self.sink.notify(Notification {
                severity,
                message,
                auto_close,
            })
        };
        match message {
            Message::Failure(text) => deliver(Message::Text(text)),
            Message::List(items) => flatten_one_level(items).into_iter().for_each(deliver),
            single => deliver(single),
        }
    }
}

fn flatten_one_level(items: Vec<Message>) -> Vec<Message> {
    items
        .into_iter()
        .flat_map(|item| match item {
            Message::List(inner) => inner,
            other => vec![other],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::RecordingSink;
    use std::collections::BTreeMap;

    fn notifier() -> (Notifier, RecordingSink) {
        let sink = RecordingSink::new();
        (Notifier::new(Arc::new(sink.clone())), sink)
    }

    #[test]
    fn test_nested_list_is_flattened_in_order() {
        let (notifier, sink) = notifier();
        let message = Message::List(vec![
            Message::from("a"),
            Message::from(vec!["b", "c"]),
        ]);
        notifier.error(message, NotifyOptions::default());

        assert_eq!(sink.texts(), vec!["a", "b", "c"]);
        assert!(sink
            .notifications()
            .iter()
            .all(|n| n.severity == Severity::Error));
    }

    #[test]
    fn test_flattening_stops_after_one_level() {
        let (notifier, sink) = notifier();
        let deep = Message::List(vec![Message::List(vec![Message::from(vec!["x", "y"])])]);
        notifier.info(deep, NotifyOptions::default());

        let received = sink.notifications();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].message, Message::from(vec!["x", "y"]));
    }

    #[test]
    fn test_failure_is_stringified() {
        let (notifier, sink) = notifier();
        let err = std::io::Error::other("disk on fire");
        notifier.error(Message::failure(&err), NotifyOptions::default());

        assert_eq!(
            sink.notifications(),
            vec![Notification {
                severity: Severity::Error,
                message: Message::Text("disk on fire".into()),
                auto_close: AutoClose::Default,
            }]
        );
    }

    #[test]
    fn test_auto_hide_mapping() {
        assert_eq!(AutoClose::from_auto_hide(Some(true)), AutoClose::Default);
        assert_eq!(AutoClose::from_auto_hide(Some(false)), AutoClose::Never);
        assert_eq!(AutoClose::from_auto_hide(None), AutoClose::Never);

        let (notifier, sink) = notifier();
        notifier.warning("careful", NotifyOptions::persistent());
        notifier.success("done", NotifyOptions { auto_hide: None });
        let received = sink.notifications();
        assert_eq!(received[0].auto_close, AutoClose::Never);
        assert_eq!(received[1].auto_close, AutoClose::Never);
    }

    #[test]
    fn test_report_bad_request_lists_messages_and_fields() {
        let (notifier, sink) = notifier();
        let mut errors = BTreeMap::new();
        errors.insert("label".to_string(), "already taken".to_string());
        notifier.report(&ActionError::BadRequest {
            messages: vec!["Validation failed".into()],
            errors,
        });

        assert_eq!(sink.texts(), vec!["Validation failed", "label: already taken"]);
    }

    #[test]
    fn test_report_http_status_uses_message() {
        let (notifier, sink) = notifier();
        notifier.report(&ActionError::HttpStatus {
            code: 500,
            message: "Server error, please check log files.".into(),
        });
        assert_eq!(sink.texts(), vec!["Server error, please check log files."]);
    }
}
