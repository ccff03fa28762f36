//! # Transport Boundary
//!
//! The controller never talks HTTP itself. It consumes a [`Transport`], which
//! executes one call and hands back a [`Cancelable`]: the settlement future of
//! the call paired with a [`CancelHandle`] that can force it to reject.
//!
//! ## Cancellation
//!
//! [`Cancelable::new`] wraps any operation future. The wrapper races the
//! operation against a `oneshot` channel; firing the handle makes the
//! settlement reject with [`TransportError`] carrying the synthetic status and
//! drops the operation. Dropping the handle without firing it leaves the
//! operation running to completion.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

/// Content type used for every JSON body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A boxed, sendable future. The transport hands these across task boundaries.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// The four verbs a transport can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope returned by the content-management API on HTTP 2xx.
///
/// Every field is optional on the wire; a missing `success` counts as a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub messages: Vec<Option<String>>,
    #[serde(default, deserialize_with = "field_errors")]
    pub errors: BTreeMap<String, String>,
}

/// Field errors as text. Lists are joined with ", ", other non-string values
/// are rendered as JSON and nulls are dropped.
fn field_errors<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(field, value)| {
            let text = match value {
                Value::Null => return None,
                Value::Array(items) => items.iter().map(error_text).collect::<Vec<_>>().join(", "),
                other => error_text(&other),
            };
            Some((field, text))
        })
        .collect())
}

fn error_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl ResponsePayload {
    /// A successful envelope around `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
            ..Self::default()
        }
    }

    /// An application-level rejection (`success: false`).
    pub fn rejected<I, S>(messages: I, errors: BTreeMap<String, String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            success: false,
            data: Value::Null,
            messages: messages.into_iter().map(|m| Some(m.into())).collect(),
            errors,
        }
    }

    /// Messages with empty and null entries dropped.
    pub fn non_empty_messages(&self) -> Vec<String> {
        self.messages
            .iter()
            .flatten()
            .filter(|m| !m.is_empty())
            .cloned()
            .collect()
    }
}

/// Rejection value of a transport call.
///
/// `status` is the HTTP status, or `0` when the request was interrupted,
/// cancelled, or the response could not be read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("transport rejected request with status {status}")]
pub struct TransportError {
    pub status: u16,
    pub body: Option<Value>,
}

impl TransportError {
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// Status `0` with no body.
    pub fn interrupted() -> Self {
        Self::new(0, None)
    }
}

/// One-shot trigger that forces a [`Cancelable`] to reject.
#[derive(Debug)]
pub struct CancelHandle {
    sender: oneshot::Sender<u16>,
}

impl CancelHandle {
    /// Rejects the paired settlement with `TransportError { status }`.
    ///
    /// Has no effect if the operation already settled.
    pub fn cancel(self, status: u16) {
        let _ = self.sender.send(status);
    }
}

/// A pending transport call plus the handle that can abort it.
pub struct Cancelable<T> {
    settlement: BoxFuture<Result<T, TransportError>>,
    handle: CancelHandle,
}

impl<T: Send + 'static> Cancelable<T> {
    pub fn new<F>(operation: F) -> Self
    where
        F: Future<Output = Result<T, TransportError>> + Send + 'static,
    {
        let (sender, cancelled) = oneshot::channel::<u16>();
        let settlement = Box::pin(async move {
            tokio::select! {
                biased;
                // A dropped handle yields Err and disables this branch.
                Ok(status) = cancelled => Err(TransportError::new(status, None)),
                outcome = operation => outcome,
            }
        });
        Self {
            settlement,
            handle: CancelHandle { sender },
        }
    }

    /// A call that has already settled with `outcome`.
    pub fn ready(outcome: Result<T, TransportError>) -> Self {
        Self::new(async move { outcome })
    }

    pub fn into_parts(self) -> (BoxFuture<Result<T, TransportError>>, CancelHandle) {
        (self.settlement, self.handle)
    }
}

/// Default status-to-message lookup used by [`Transport::error_message_by_status`].
pub fn default_status_message(status: u16) -> String {
    match status {
        401 => "Session expired, please reload the page.".to_string(),
        403 => "Authorization error, please reload the page or try to logout/login again."
            .to_string(),
        s if s >= 500 => "Server error, please check log files.".to_string(),
        s => format!("Request failed with status {s}"),
    }
}

/// Network capability consumed by the controller.
///
/// Implementors provide [`send`](Transport::send); the verb helpers forward to
/// it. `GET` never carries a body.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<String>,
        content_type: &str,
    ) -> Cancelable<ResponsePayload>;

    fn get(&self, url: &str) -> Cancelable<ResponsePayload> {
        self.send(HttpMethod::Get, url, None, JSON_CONTENT_TYPE)
    }

    fn post(&self, url: &str, body: String, content_type: &str) -> Cancelable<ResponsePayload> {
        self.send(HttpMethod::Post, url, Some(body), content_type)
    }

    fn put(&self, url: &str, body: String, content_type: &str) -> Cancelable<ResponsePayload> {
        self.send(HttpMethod::Put, url, Some(body), content_type)
    }

    fn del(&self, url: &str, body: String, content_type: &str) -> Cancelable<ResponsePayload> {
        self.send(HttpMethod::Delete, url, Some(body), content_type)
    }

    fn error_message_by_status(&self, status: u16) -> String {
        default_status_message(status)
    }
}
