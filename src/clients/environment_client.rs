use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::clients::action_client::ActionClient;
use crate::clients::ClientError;
use crate::framework::{ActionKind, ActionRequestController, ResourceDescriptor, Transport};
use crate::model::{EnvironmentCreate, EnvironmentDelete, EnvironmentUpdate};

/// Client for `/projects/{label}/environments`.
///
/// Every operation is addressed by the owning project's label; the
/// environment itself is identified inside the body.
#[derive(Clone, Debug)]
pub struct EnvironmentClient {
    controller: ActionRequestController,
}

impl EnvironmentClient {
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let descriptor = ResourceDescriptor::nested("projects", "environments")?;
        Ok(Self {
            controller: ActionRequestController::new(descriptor, transport),
        })
    }

    #[instrument(skip(self, environment), fields(project = %environment.project_label, label = %environment.label))]
    pub async fn create_environment(
        &self,
        environment: &EnvironmentCreate,
    ) -> Result<Value, ClientError> {
        debug!(predecessor = ?environment.predecessor_label, "Sending request");
        self.submit(
            environment,
            ActionKind::Create,
            Some(&environment.project_label),
        )
        .await
    }

    #[instrument(skip(self, environment), fields(project = %environment.project_label, label = %environment.label))]
    pub async fn update_environment(
        &self,
        environment: &EnvironmentUpdate,
    ) -> Result<Value, ClientError> {
        self.update(&environment.project_label, environment).await
    }

    #[instrument(skip(self, environment), fields(project = %environment.project_label))]
    pub async fn delete_environment(
        &self,
        environment: &EnvironmentDelete,
    ) -> Result<Value, ClientError> {
        debug!(label = %environment.environment_label, "Sending request");
        self.submit(
            environment,
            ActionKind::Delete,
            Some(&environment.project_label),
        )
        .await
    }
}

impl ActionClient for EnvironmentClient {
    fn controller(&self) -> &ActionRequestController {
        &self.controller
    }
}
