//! # Action Request Controller
//!
//! This module defines the single-flight controller that issues lifecycle
//! actions against a content-management resource.
//!
//! ## Key Types
//!
//! - [`ResourceDescriptor`]: Which collection the controller targets.
//! - [`ActionKind`]: The operation, mapped to exactly one transport verb.
//! - [`ActionRequestController`]: Owns the loading state and the in-flight request.
//! - [`ActionFuture`]: What a caller awaits for the outcome of one action.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::framework::error::{ActionError, DescriptorError};
use crate::framework::transport::{
    CancelHandle, HttpMethod, ResponsePayload, Transport, TransportError, JSON_CONTENT_TYPE,
};
use crate::framework::url;

// =============================================================================
// 1. THE VOCABULARY (Descriptor and Action Kinds)
// =============================================================================

/// The (resource, nested resource) pair identifying which collection an action targets.
///
/// Immutable once built. An empty nested resource is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    resource: String,
    nested_resource: Option<String>,
}

impl ResourceDescriptor {
    pub fn new(resource: impl Into<String>) -> Result<Self, DescriptorError> {
        let resource = resource.into();
        if resource.is_empty() {
            return Err(DescriptorError::EmptyResource);
        }
        Ok(Self {
            resource,
            nested_resource: None,
        })
    }

    /// A descriptor addressing `/<resource>/<id>/<nested>`.
    pub fn nested(
        resource: impl Into<String>,
        nested_resource: impl Into<String>,
    ) -> Result<Self, DescriptorError> {
        let nested_resource = nested_resource.into();
        let mut descriptor = Self::new(resource)?;
        descriptor.nested_resource = Some(nested_resource).filter(|n| !n.is_empty());
        Ok(descriptor)
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn nested_resource(&self) -> Option<&str> {
        self.nested_resource.as_deref()
    }

    /// Endpoint path for this descriptor and an optional id.
    pub fn path(&self, id: Option<&str>) -> String {
        url::build(&self.resource, self.nested_resource(), id)
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.nested_resource {
            Some(nested) => write!(f, "{}/*/{}", self.resource, nested),
            None => f.write_str(&self.resource),
        }
    }
}

/// The enumerated operation type driving verb selection.
///
/// # The CRUD Pattern
/// The variants map to the standard lifecycle operations on a resource, plus
/// `Action` for resource-specific operations (build, promote) that do not fit
/// CRUD. Both `Create` and `Action` are sent as `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionKind {
    #[default]
    Get,
    Create,
    Action,
    Update,
    Delete,
}

impl ActionKind {
    pub fn method(self) -> HttpMethod {
        match self {
            ActionKind::Get => HttpMethod::Get,
            ActionKind::Create | ActionKind::Action => HttpMethod::Post,
            ActionKind::Update => HttpMethod::Put,
            ActionKind::Delete => HttpMethod::Delete,
        }
    }

    /// Parses an action name. Unknown names fall back to [`ActionKind::Get`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "create" => ActionKind::Create,
            "action" => ActionKind::Action,
            "update" => ActionKind::Update,
            "delete" => ActionKind::Delete,
            "get" => ActionKind::Get,
            other => {
                debug!(action = other, "Unknown action name, falling back to get");
                ActionKind::Get
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Get => "get",
            ActionKind::Create => "create",
            ActionKind::Action => "action",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// 2. THE CALLER'S FUTURE
// =============================================================================

/// Outcome of one [`ActionRequestController::invoke_action`] call.
///
/// Resolves with the response's `data` field or an [`ActionError`]. A call
/// made while another action was in flight yields a future that never
/// settles.
#[must_use = "the action outcome is only observable by awaiting the future"]
pub struct ActionFuture {
    state: ActionFutureState,
}

enum ActionFutureState {
    Ignored,
    Issued(oneshot::Receiver<Result<Value, ActionError>>),
}

impl ActionFuture {
    fn ignored() -> Self {
        Self {
            state: ActionFutureState::Ignored,
        }
    }

    fn issued(settled: oneshot::Receiver<Result<Value, ActionError>>) -> Self {
        Self {
            state: ActionFutureState::Issued(settled),
        }
    }

    /// True when the call was absorbed because a request was already pending.
    pub fn is_ignored(&self) -> bool {
        matches!(self.state, ActionFutureState::Ignored)
    }
}

impl Future for ActionFuture {
    type Output = Result<Value, ActionError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            ActionFutureState::Ignored => Poll::Pending,
            // The settlement task always resolves unless the runtime shut down under it.
            ActionFutureState::Issued(settled) => Pin::new(settled)
                .poll(cx)
                .map(|outcome| outcome.unwrap_or(Err(ActionError::NetworkInterrupted))),
        }
    }
}

impl fmt::Debug for ActionFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionFuture")
            .field("ignored", &self.is_ignored())
            .finish()
    }
}

// =============================================================================
// 3. THE CONTROLLER
// =============================================================================

struct PendingRequest {
    seq: u64,
    cancel: CancelHandle,
}

#[derive(Default)]
struct ControllerState {
    pending: Option<PendingRequest>,
    next_seq: u64,
}

/// Issues lifecycle actions for one resource, at most one at a time.
///
/// # Architecture Note
/// The controller is cheap to clone; clones share the same state, so they
/// count as the same controller for the single-flight rule.
///
/// **Concurrency Model**:
/// The state sits behind a `Mutex` that is only held for synchronous
/// transitions, never across an `.await`. The transport call and outcome
/// interpretation run on a spawned settlement task, so the controller returns
/// to idle even if the caller drops the [`ActionFuture`].
#[derive(Clone)]
pub struct ActionRequestController {
    descriptor: Arc<ResourceDescriptor>,
    transport: Arc<dyn Transport>,
    state: Arc<Mutex<ControllerState>>,
}

impl ActionRequestController {
    pub fn new(descriptor: ResourceDescriptor, transport: Arc<dyn Transport>) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            transport,
            state: Arc::new(Mutex::new(ControllerState::default())),
        }
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// Whether an action is currently in flight.
    pub fn is_loading(&self) -> bool {
        lock(&self.state).pending.is_some()
    }

    /// Issues `kind` against the descriptor's endpoint with `body` as JSON.
    ///
    /// The transition to loading happens before this returns. If an action
    /// is already in flight, nothing is sent and the returned future never
    /// settles.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn invoke_action(&self, body: Value, kind: ActionKind, id: Option<&str>) -> ActionFuture {
        let resource = self.descriptor.resource();
        let mut state = lock(&self.state);
        if state.pending.is_some() {
            debug!(resource, %kind, "Action already in flight, ignoring");
            return ActionFuture::ignored();
        }

        let url = self.descriptor.path(id);
        let payload = body.to_string();
        let request = match kind.method() {
            HttpMethod::Get => self.transport.get(&url),
            HttpMethod::Post => self.transport.post(&url, payload, JSON_CONTENT_TYPE),
            HttpMethod::Put => self.transport.put(&url, payload, JSON_CONTENT_TYPE),
            HttpMethod::Delete => self.transport.del(&url, payload, JSON_CONTENT_TYPE),
        };
        let (response, cancel) = request.into_parts();

        let seq = state.next_seq;
        state.next_seq += 1;
        state.pending = Some(PendingRequest { seq, cancel });
        drop(state);
        debug!(resource, %kind, %url, seq, "Action issued");

        let (resolve, settled) = oneshot::channel();
        let shared = Arc::clone(&self.state);
        let transport = Arc::clone(&self.transport);
        let span = info_span!("action", resource, %kind, seq);
        tokio::spawn(
            async move {
                let outcome = interpret(response.await, transport.as_ref());
                // Back to idle before anyone observes the outcome.
                let settled_here = finish(&shared, seq);
                let outcome = reconcile(outcome, settled_here);
                match &outcome {
                    Ok(_) => info!(%url, "Action ok"),
                    Err(e) => warn!(%url, status = e.status(), error = %e, "Action failed"),
                }
                let _ = resolve.send(outcome);
            }
            .instrument(span),
        );

        ActionFuture::issued(settled)
    }

    /// Aborts the in-flight action, if any.
    ///
    /// The pending slot is freed immediately and the action's future rejects
    /// with [`ActionError::NetworkInterrupted`]. A no-op when idle.
    pub fn cancel_action(&self) {
        let pending = lock(&self.state).pending.take();
        match pending {
            Some(PendingRequest { seq, cancel }) => {
                info!(resource = self.descriptor.resource(), seq, "Action cancelled");
                cancel.cancel(0);
            }
            None => debug!(resource = self.descriptor.resource(), "Nothing to cancel"),
        }
    }
}

impl fmt::Debug for ActionRequestController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRequestController")
            .field("descriptor", &self.descriptor)
            .field("is_loading", &self.is_loading())
            .finish()
    }
}

fn lock(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the pending slot if it still holds request `seq`.
///
/// Returns false when the request was already cancelled or superseded.
fn finish(state: &Mutex<ControllerState>, seq: u64) -> bool {
    let mut state = lock(state);
    match &state.pending {
        Some(pending) if pending.seq == seq => {
            state.pending = None;
            true
        }
        _ => false,
    }
}

// =============================================================================
// 4. OUTCOME INTERPRETATION
// =============================================================================

/// A request whose slot was taken by `cancel_action` reports the cancellation,
/// even when its response arrived first.
fn reconcile(
    outcome: Result<Value, ActionError>,
    settled_here: bool,
) -> Result<Value, ActionError> {
    if settled_here {
        outcome
    } else {
        debug!("Request was cancelled before it settled");
        Err(ActionError::NetworkInterrupted)
    }
}

fn interpret(
    outcome: Result<ResponsePayload, TransportError>,
    transport: &dyn Transport,
) -> Result<Value, ActionError> {
    match outcome {
        Ok(payload) if payload.success => Ok(payload.data),
        Ok(payload) => Err(bad_request(&payload)),
        Err(rejection) => Err(classify(rejection, transport)),
    }
}

fn classify(rejection: TransportError, transport: &dyn Transport) -> ActionError {
    match rejection.status {
        0 => ActionError::NetworkInterrupted,
        400 => {
            let payload = rejection
                .body
                .and_then(|body| serde_json::from_value::<ResponsePayload>(body).ok())
                .unwrap_or_default();
            bad_request(&payload)
        }
        code => ActionError::HttpStatus {
            code,
            message: transport.error_message_by_status(code),
        },
    }
}

fn bad_request(payload: &ResponsePayload) -> ActionError {
    ActionError::BadRequest {
        messages: payload.non_empty_messages(),
        errors: payload.errors.clone(),
    }
}

// =============================================================================
// 5. UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{channel_transport, expect_call, MockTransport};
    use crate::framework::transport::Cancelable;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn projects(transport: Arc<dyn Transport>) -> ActionRequestController {
        ActionRequestController::new(ResourceDescriptor::new("projects").unwrap(), transport)
    }

    #[test]
    fn test_kind_to_verb_table() {
        assert_eq!(ActionKind::Get.method(), HttpMethod::Get);
        assert_eq!(ActionKind::Create.method(), HttpMethod::Post);
        assert_eq!(ActionKind::Action.method(), HttpMethod::Post);
        assert_eq!(ActionKind::Update.method(), HttpMethod::Put);
        assert_eq!(ActionKind::Delete.method(), HttpMethod::Delete);
    }

    #[test]
    fn test_unknown_action_name_falls_back_to_get() {
        assert_eq!(ActionKind::from_name("promote"), ActionKind::Get);
        assert_eq!(ActionKind::from_name("delete"), ActionKind::Delete);
    }

    #[test]
    fn test_descriptor_rejects_empty_resource() {
        assert_eq!(ResourceDescriptor::new(""), Err(DescriptorError::EmptyResource));
        let nested = ResourceDescriptor::nested("projects", "").unwrap();
        assert_eq!(nested.nested_resource(), None);
    }

    #[tokio::test]
    async fn test_success_resolves_with_data() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_post("/rhn/manager/api/contentmanagement/projects")
            .return_ok(json!({ "id": 7 }));
        let controller = projects(mock.clone());

        let future = controller.invoke_action(json!({ "label": "p" }), ActionKind::Create, None);
        assert!(controller.is_loading());

        let data = future.await.unwrap();
        assert_eq!(data, json!({ "id": 7 }));
        assert!(!controller.is_loading());
        mock.verify();
    }

    #[tokio::test]
    async fn test_application_rejection_is_bad_request() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_put("/rhn/manager/api/contentmanagement/projects/p1")
            .return_payload(ResponsePayload::rejected(["bad field", ""], BTreeMap::new()));
        let controller = projects(mock.clone());

        let err = controller
            .invoke_action(json!({}), ActionKind::Update, Some("p1"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ActionError::BadRequest {
                messages: vec!["bad field".into()],
                errors: BTreeMap::new(),
            }
        );
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_status_classification() {
        let mock = Arc::new(MockTransport::new().with_status_message(500, "boom"));
        let path = "/rhn/manager/api/contentmanagement/projects/p1";
        mock.expect_delete(path).return_err(0, None);
        mock.expect_delete(path).return_err(
            400,
            Some(json!({ "messages": ["m1", "m2"], "errors": { "field": "bad" } })),
        );
        mock.expect_delete(path).return_err(500, None);
        let controller = projects(mock.clone());

        let interrupted = controller
            .invoke_action(json!({}), ActionKind::Delete, Some("p1"))
            .await;
        assert_eq!(interrupted, Err(ActionError::NetworkInterrupted));

        let bad = controller
            .invoke_action(json!({}), ActionKind::Delete, Some("p1"))
            .await;
        let mut errors = BTreeMap::new();
        errors.insert("field".to_string(), "bad".to_string());
        assert_eq!(
            bad,
            Err(ActionError::BadRequest {
                messages: vec!["m1".into(), "m2".into()],
                errors,
            })
        );

        let server = controller
            .invoke_action(json!({}), ActionKind::Delete, Some("p1"))
            .await;
        assert_eq!(
            server,
            Err(ActionError::HttpStatus {
                code: 500,
                message: "boom".into(),
            })
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_bad_request_without_body() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_post("/rhn/manager/api/contentmanagement/projects")
            .return_err(400, None);
        let controller = projects(mock);

        let err = controller
            .invoke_action(json!({}), ActionKind::Create, None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ActionError::BadRequest {
                messages: vec![],
                errors: BTreeMap::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_second_call_is_ignored_while_loading() {
        let (transport, mut calls) = channel_transport();
        let controller = projects(transport);

        let first = controller.invoke_action(json!({ "n": 1 }), ActionKind::Create, None);
        let second = controller.invoke_action(json!({ "n": 2 }), ActionKind::Create, None);
        assert!(!first.is_ignored());
        assert!(second.is_ignored());
        assert!(controller.is_loading());

        let call = expect_call(&mut calls).await.expect("first call");
        assert_eq!(call.body_json(), Some(json!({ "n": 1 })));
        assert!(calls.try_recv().is_err(), "second call must not reach the transport");

        call.respond(Ok(ResponsePayload::ok(json!(1))));
        assert_eq!(first.await, Ok(json!(1)));
        assert!(!controller.is_loading());

        let never = tokio::time::timeout(Duration::from_millis(20), second).await;
        assert!(never.is_err(), "ignored call must never settle");
    }

    #[tokio::test]
    async fn test_cancel_interrupts_and_frees_slot() {
        let (transport, mut calls) = channel_transport();
        let controller = projects(transport);

        let future = controller.invoke_action(json!({}), ActionKind::Create, None);
        let call = expect_call(&mut calls).await.expect("call");

        controller.cancel_action();
        assert!(!controller.is_loading());
        controller.cancel_action();
        assert!(!controller.is_loading());

        assert_eq!(future.await, Err(ActionError::NetworkInterrupted));

        // A late response for the cancelled request goes nowhere.
        call.respond(Ok(ResponsePayload::ok(json!("late"))));
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_cancelled_settlement_does_not_clear_new_request() {
        let (transport, mut calls) = channel_transport();
        let controller = projects(transport);

        let first = controller.invoke_action(json!({}), ActionKind::Create, None);
        let _first_call = expect_call(&mut calls).await.expect("first call");
        controller.cancel_action();

        let second = controller.invoke_action(json!({}), ActionKind::Create, None);
        assert!(!second.is_ignored());
        let second_call = expect_call(&mut calls).await.expect("second call");

        assert_eq!(first.await, Err(ActionError::NetworkInterrupted));
        assert!(controller.is_loading(), "second request is still in flight");

        second_call.respond(Ok(ResponsePayload::ok(json!(2))));
        assert_eq!(second.await, Ok(json!(2)));
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_cancel_after_settlement_is_noop() {
        let mock = Arc::new(MockTransport::new());
        mock.expect_get("/rhn/manager/api/contentmanagement/projects/p1")
            .return_ok(json!(null));
        let controller = projects(mock);

        let result = controller
            .invoke_action(json!({}), ActionKind::Get, Some("p1"))
            .await;
        assert_eq!(result, Ok(json!(null)));
        controller.cancel_action();
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_get_sends_no_body() {
        let (transport, mut calls) = channel_transport();
        let controller = projects(transport);

        let future = controller.invoke_action(json!({ "ignored": true }), ActionKind::Get, None);
        let call = expect_call(&mut calls).await.expect("call");
        assert_eq!(call.method, HttpMethod::Get);
        assert!(call.body.is_none());
        call.respond(Ok(ResponsePayload::ok(json!([]))));
        assert_eq!(future.await, Ok(json!([])));
    }

    #[tokio::test]
    async fn test_dropped_future_still_returns_to_idle() {
        let (transport, mut calls) = channel_transport();
        let controller = projects(transport);

        drop(controller.invoke_action(json!({}), ActionKind::Delete, Some("p1")));
        let call = expect_call(&mut calls).await.expect("call");
        call.respond(Ok(ResponsePayload::ok(Value::Null)));

        tokio::time::timeout(Duration::from_secs(1), async {
            while controller.is_loading() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("controller returns to idle");
    }

    /// Cancels its controller while the response is being produced, so the
    /// response is ready but the slot is already gone when settlement runs.
    #[derive(Default)]
    struct CancelDuringResponse {
        controller: std::sync::OnceLock<ActionRequestController>,
    }

    impl Transport for CancelDuringResponse {
        fn send(
            &self,
            _method: HttpMethod,
            _url: &str,
            _body: Option<String>,
            _content_type: &str,
        ) -> Cancelable<ResponsePayload> {
            let controller = self.controller.get().cloned();
            Cancelable::new(async move {
                if let Some(controller) = controller {
                    controller.cancel_action();
                }
                Ok(ResponsePayload::ok(json!({ "id": 7 })))
            })
        }
    }

    #[tokio::test]
    async fn test_cancel_racing_response_reports_interruption() {
        let transport = Arc::new(CancelDuringResponse::default());
        let controller = projects(transport.clone());
        transport.controller.set(controller.clone()).unwrap();

        let outcome = controller
            .invoke_action(json!({}), ActionKind::Create, None)
            .await;
        assert_eq!(outcome, Err(ActionError::NetworkInterrupted));
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_reconcile_keeps_outcome_only_when_settled_here() {
        assert_eq!(reconcile(Ok(json!(1)), true), Ok(json!(1)));
        assert_eq!(reconcile(Ok(json!(1)), false), Err(ActionError::NetworkInterrupted));
    }
}
