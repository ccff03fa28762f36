use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::clients::ClientError;
use crate::framework::{ActionKind, ActionRequestController, DescriptorError};

/// Trait for resource-specific clients to inherit the standard lifecycle actions.
///
/// Implementors only expose their controller; the provided methods encode the
/// body, pick the [`ActionKind`] and await the outcome. Like the controller,
/// calling any of them while another action of the same client is in flight
/// returns a future that never completes.
#[async_trait]
pub trait ActionClient: Send + Sync {
    /// Access the underlying controller.
    fn controller(&self) -> &ActionRequestController;

    /// Encodes `body` and runs `kind` against the endpoint for `id`.
    ///
    /// Nested clients refuse to run without an id; nothing is sent.
    async fn submit<B>(&self, body: &B, kind: ActionKind, id: Option<&str>) -> Result<Value, ClientError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let descriptor = self.controller().descriptor();
        if let Some(nested) = descriptor.nested_resource() {
            if id.map_or(true, str::is_empty) {
                return Err(DescriptorError::MissingId {
                    resource: descriptor.resource().to_string(),
                    nested: nested.to_string(),
                }
                .into());
            }
        }
        let body = serde_json::to_value(body)?;
        Ok(self.controller().invoke_action(body, kind, id).await?)
    }

    /// Fetch the collection, or one item when `id` is given.
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, id: Option<&str>) -> Result<Value, ClientError> {
        tracing::debug!("Sending request");
        self.submit(&Value::Null, ActionKind::Get, id).await
    }

    /// Create a new item from `body`.
    async fn create<B>(&self, body: &B) -> Result<Value, ClientError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.submit(body, ActionKind::Create, None).await
    }

    async fn update<B>(&self, id: &str, body: &B) -> Result<Value, ClientError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.submit(body, ActionKind::Update, Some(id)).await
    }

    /// Remove the item `id`.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<Value, ClientError> {
        tracing::debug!("Sending request");
        self.submit(&serde_json::json!({}), ActionKind::Delete, Some(id)).await
    }

    /// Trigger a server-side operation such as build or promote.
    async fn perform<B>(&self, id: &str, body: &B) -> Result<Value, ClientError>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.submit(body, ActionKind::Action, Some(id)).await
    }

    fn is_loading(&self) -> bool {
        self.controller().is_loading()
    }

    fn cancel(&self) {
        self.controller().cancel_action();
    }
}
