//! # Build and Promote Clients
//!
//! Long-running server operations on a project. Both use the `action`
//! kind, which is a POST to the project-scoped endpoint.
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};

use crate::clients::action_client::ActionClient;
use crate::clients::ClientError;
use crate::framework::{ActionRequestController, ResourceDescriptor, Transport};
use crate::model::{BuildRequest, PromoteRequest};

/// Client for `/projects/{label}/build`.
#[derive(Clone, Debug)]
pub struct BuildClient {
    controller: ActionRequestController,
}

impl BuildClient {
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let descriptor = ResourceDescriptor::nested("projects", "build")?;
        Ok(Self {
            controller: ActionRequestController::new(descriptor, transport),
        })
    }

    #[instrument(skip(self, request), fields(project = %request.project_label))]
    pub async fn build(&self, request: &BuildRequest) -> Result<Value, ClientError> {
        let result = self.perform(&request.project_label, request).await?;
        info!("Build started");
        Ok(result)
    }
}

impl ActionClient for BuildClient {
    fn controller(&self) -> &ActionRequestController {
        &self.controller
    }
}

/// Client for `/projects/{label}/promote`.
#[derive(Clone, Debug)]
pub struct PromoteClient {
    controller: ActionRequestController,
}

impl PromoteClient {
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let descriptor = ResourceDescriptor::nested("projects", "promote")?;
        Ok(Self {
            controller: ActionRequestController::new(descriptor, transport),
        })
    }

    #[instrument(skip(self, request), fields(project = %request.project_label, environment = %request.environment_promote_label))]
    pub async fn promote(&self, request: &PromoteRequest) -> Result<Value, ClientError> {
        let result = self.perform(&request.project_label, request).await?;
        info!("Promotion started");
        Ok(result)
    }
}

impl ActionClient for PromoteClient {
    fn controller(&self) -> &ActionRequestController {
        &self.controller
    }
}
