//! # Project Client
//!
//! Provides a high-level API for projects and their software sources.
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::clients::action_client::ActionClient;
use crate::clients::ClientError;
use crate::framework::{ActionRequestController, ResourceDescriptor, Transport};
use crate::model::{ProjectProperties, SourcesUpdate};

/// Client for `/projects`.
#[derive(Clone, Debug)]
pub struct ProjectClient {
    controller: ActionRequestController,
}

impl ProjectClient {
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let descriptor = ResourceDescriptor::new("projects")?;
        Ok(Self {
            controller: ActionRequestController::new(descriptor, transport),
        })
    }

    #[instrument(skip(self, project), fields(label = %project.label))]
    pub async fn create_project(&self, project: &ProjectProperties) -> Result<Value, ClientError> {
        debug!(?project, "create_project called");
        self.create(project).await
    }

    #[instrument(skip(self, project))]
    pub async fn update_project(
        &self,
        label: &str,
        project: &ProjectProperties,
    ) -> Result<Value, ClientError> {
        debug!(?project, "update_project called");
        self.update(label, project).await
    }

    pub async fn delete_project(&self, label: &str) -> Result<Value, ClientError> {
        self.delete(label).await
    }
}

impl ActionClient for ProjectClient {
    fn controller(&self) -> &ActionRequestController {
        &self.controller
    }
}

/// Client for `/projects/{label}/softwaresources`.
#[derive(Clone, Debug)]
pub struct SourceClient {
    controller: ActionRequestController,
}

impl SourceClient {
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let descriptor = ResourceDescriptor::nested("projects", "softwaresources")?;
        Ok(Self {
            controller: ActionRequestController::new(descriptor, transport),
        })
    }

    /// Replaces the project's sources with `update.software_sources`.
    #[instrument(skip(self, update), fields(project = %update.project_label))]
    pub async fn update_sources(&self, update: &SourcesUpdate) -> Result<Value, ClientError> {
        debug!(sources = update.software_sources.len(), "Sending request");
        self.update(&update.project_label, update).await
    }
}

impl ActionClient for SourceClient {
    fn controller(&self) -> &ActionRequestController {
        &self.controller
    }
}
