//! # Mock Framework
//!
//! Utilities for testing controllers and clients without a server.
//!
//! Two styles are available, mirroring each other:
//!
//! - [`MockTransport`]: a fluent expectation queue. Each expected call is
//!   answered immediately (or never, see [`ExpectationBuilder::hang`]), and
//!   [`MockTransport::verify`] asserts that every expectation was consumed.
//! - [`channel_transport`] + [`expect_call`]: every call is forwarded to a
//!   receiver the test owns, so the test decides *when* and *how* each request
//!   settles. This is the tool for exercising in-flight state and cancellation.
//!
//! [`RecordingSink`] captures notifications for assertions on the notifier.
//!
//! ```ignore
//! let mock = Arc::new(MockTransport::new());
//! mock.expect_post("/rhn/manager/api/contentmanagement/projects")
//!     .return_ok(json!({ "label": "p1" }));
//!
//! let controller = ActionRequestController::new(descriptor, mock.clone());
//! controller.invoke_action(json!({}), ActionKind::Create, None).await?;
//! mock.verify();
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::framework::transport::{
    default_status_message, Cancelable, HttpMethod, ResponsePayload, Transport, TransportError,
};
use crate::notify::{Notification, NotificationSink};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Reply {
    Respond(Result<ResponsePayload, TransportError>),
    Hang,
}

struct Expectation {
    method: HttpMethod,
    url: String,
    reply: Reply,
}

/// A call observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
    pub content_type: String,
}

impl RecordedCall {
    pub fn body_json(&self) -> Option<Value> {
        self.body.as_deref().and_then(|b| serde_json::from_str(b).ok())
    }
}

/// A transport with expectation tracking for fluent testing.
#[derive(Default)]
pub struct MockTransport {
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    status_messages: HashMap<u16, String>,
}

impl MockTransport {
    /// Creates a new mock transport with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the status-to-message lookup for `status`.
    pub fn with_status_message(mut self, status: u16, message: impl Into<String>) -> Self {
        self.status_messages.insert(status, message.into());
        self
    }

    pub fn expect(&self, method: HttpMethod, url: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            url: url.into(),
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_get(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(HttpMethod::Get, url)
    }

    pub fn expect_post(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(HttpMethod::Post, url)
    }

    pub fn expect_put(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(HttpMethod::Put, url)
    }

    pub fn expect_delete(&self, url: impl Into<String>) -> ExpectationBuilder {
        self.expect(HttpMethod::Delete, url)
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<String>,
        content_type: &str,
    ) -> Cancelable<ResponsePayload> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            body,
            content_type: content_type.to_string(),
        });

        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(exp) if exp.method == method && exp.url == url => match exp.reply {
                Reply::Respond(outcome) => Cancelable::ready(outcome),
                Reply::Hang => Cancelable::new(std::future::pending()),
            },
            Some(exp) => panic!(
                "Unexpected request {method} {url}, expected {} {}",
                exp.method, exp.url
            ),
            None => panic!("Unexpected request {method} {url}, no expectation left"),
        }
    }

    fn error_message_by_status(&self, status: u16) -> String {
        self.status_messages
            .get(&status)
            .cloned()
            .unwrap_or_else(|| default_status_message(status))
    }
}

/// Builder for a single expected call.
pub struct ExpectationBuilder {
    method: HttpMethod,
    url: String,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    fn push(self, reply: Reply) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            method: self.method,
            url: self.url,
            reply,
        });
    }

    /// Answers with `{ success: true, data }`.
    pub fn return_ok(self, data: Value) {
        self.push(Reply::Respond(Ok(ResponsePayload::ok(data))));
    }

    /// Answers with an arbitrary 2xx envelope.
    pub fn return_payload(self, payload: ResponsePayload) {
        self.push(Reply::Respond(Ok(payload)));
    }

    /// Rejects with `status` and an optional response body.
    pub fn return_err(self, status: u16, body: Option<Value>) {
        self.push(Reply::Respond(Err(TransportError::new(status, body))));
    }

    /// Never answers; only cancellation settles the call.
    pub fn hang(self) {
        self.push(Reply::Hang);
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// A call forwarded by [`ChannelTransport`], answered by the test.
#[derive(Debug)]
pub struct TransportCall {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
    pub content_type: String,
    pub respond_to: oneshot::Sender<Result<ResponsePayload, TransportError>>,
}

impl TransportCall {
    pub fn body_json(&self) -> Option<Value> {
        self.body.as_deref().and_then(|b| serde_json::from_str(b).ok())
    }

    /// Settles the call. Ignored if the call was cancelled in the meantime.
    pub fn respond(self, outcome: Result<ResponsePayload, TransportError>) {
        let _ = self.respond_to.send(outcome);
    }
}

/// Transport forwarding every call to a channel.
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<TransportCall>,
}

impl Transport for ChannelTransport {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<String>,
        content_type: &str,
    ) -> Cancelable<ResponsePayload> {
        let (respond_to, response) = oneshot::channel();
        let _ = self.sender.send(TransportCall {
            method,
            url: url.to_string(),
            body,
            content_type: content_type.to_string(),
            respond_to,
        });
        Cancelable::new(async move {
            match response.await {
                Ok(outcome) => outcome,
                // Test dropped the call without answering.
                Err(_) => Err(TransportError::interrupted()),
            }
        })
    }
}

/// Creates a transport and the receiver its calls arrive on.
///
/// # Testing Strategy
/// We don't want a real server just to test controller state. Every call made
/// through the returned transport lands on `receiver` together with a
/// responder, so the test can inspect the request, assert on in-flight state,
/// and settle it (or not) exactly when it wants to.
pub fn channel_transport() -> (Arc<ChannelTransport>, mpsc::UnboundedReceiver<TransportCall>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Arc::new(ChannelTransport { sender }), receiver)
}

/// Waits for the next forwarded call.
pub async fn expect_call(
    receiver: &mut mpsc::UnboundedReceiver<TransportCall>,
) -> Option<TransportCall> {
    receiver.recv().await
}

// =============================================================================
// NOTIFICATION SINK
// =============================================================================

/// Sink that keeps every notification it receives.
#[derive(Clone, Default)]
pub struct RecordingSink {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }

    /// Rendered text of every notification, in delivery order.
    pub fn texts(&self) -> Vec<String> {
        self.notifications()
            .iter()
            .map(|n| n.message.text())
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_with_expectations() {
        let mock = MockTransport::new();
        mock.expect_post("/a").return_ok(json!(1));
        mock.expect_get("/b").return_err(404, None);

        let (first, _) = mock.post("/a", "{}".into(), "application/json").into_parts();
        assert_eq!(first.await, Ok(ResponsePayload::ok(json!(1))));

        let (second, _) = mock.get("/b").into_parts();
        assert_eq!(second.await, Err(TransportError::new(404, None)));

        assert_eq!(mock.calls().len(), 2);
        assert_eq!(mock.calls()[0].body_json(), Some(json!({})));
        mock.verify();
    }

    #[tokio::test]
    async fn test_hanging_expectation_settles_on_cancel() {
        let mock = MockTransport::new();
        mock.expect_put("/c").hang();

        let (settlement, handle) = mock.put("/c", "{}".into(), "application/json").into_parts();
        handle.cancel(0);
        assert_eq!(settlement.await, Err(TransportError::interrupted()));
    }

    #[tokio::test]
    #[should_panic(expected = "no expectation left")]
    async fn test_unexpected_call_panics() {
        let mock = MockTransport::new();
        let _ = mock.get("/nope");
    }

    #[tokio::test]
    async fn test_channel_transport_forwards_calls() {
        let (transport, mut receiver) = channel_transport();
        let (settlement, _handle) = transport
            .del("/d", "{\"x\":1}".into(), "application/json")
            .into_parts();

        let call = expect_call(&mut receiver).await.expect("Expected call");
        assert_eq!(call.method, HttpMethod::Delete);
        assert_eq!(call.body_json(), Some(json!({ "x": 1 })));
        call.respond(Ok(ResponsePayload::ok(json!("done"))));

        assert_eq!(settlement.await, Ok(ResponsePayload::ok(json!("done"))));
    }
}
