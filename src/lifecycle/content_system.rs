use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::clients::{
    ActionClient, BuildClient, ClientError, EnvironmentClient, FilterClient, ProjectClient,
    PromoteClient, SourceClient,
};
use crate::framework::{ActionRequestController, Transport};
use crate::http::HttpTransport;
use crate::lifecycle::config::{ClientConfig, ConfigError};
use crate::notify::{Message, NotificationSink, Notifier, NotifyOptions, TracingSink};

/// Errors raised while assembling a [`ContentManagementSystem`].
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Entry point wiring every resource client to one transport and one
/// notification surface.
///
/// Each client owns its own controller, so different resources can be in
/// flight at the same time while each one stays single-flight.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::load(None)?;
/// let system = ContentManagementSystem::new(&config)?;
///
/// let outcome = system.projects.create_project(&props).await;
/// system.notify_outcome(outcome, "Project created")?;
/// ```
pub struct ContentManagementSystem {
    pub projects: ProjectClient,
    pub environments: EnvironmentClient,
    pub sources: SourceClient,
    pub filters: FilterClient,
    pub builds: BuildClient,
    pub promotions: PromoteClient,
    pub notifier: Notifier,
}

impl ContentManagementSystem {
    /// Builds the system on an [`HttpTransport`] and a [`TracingSink`].
    pub fn new(config: &ClientConfig) -> Result<Self, SystemError> {
        let transport = HttpTransport::new(config.server_url.clone(), config.request_timeout())?;
        info!(server = transport.server_url(), "Connecting to content management API");
        let sink = TracingSink::new(config.auto_close());
        Self::with_parts(Arc::new(transport), Arc::new(sink))
    }

    pub fn with_parts(
        transport: Arc<dyn Transport>,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, SystemError> {
        Ok(Self {
            projects: ProjectClient::new(transport.clone())?,
            environments: EnvironmentClient::new(transport.clone())?,
            sources: SourceClient::new(transport.clone())?,
            filters: FilterClient::new(transport.clone())?,
            builds: BuildClient::new(transport.clone())?,
            promotions: PromoteClient::new(transport)?,
            notifier: Notifier::new(sink),
        })
    }

    fn controllers(&self) -> [&ActionRequestController; 6] {
        [
            self.projects.controller(),
            self.environments.controller(),
            self.sources.controller(),
            self.filters.controller(),
            self.builds.controller(),
            self.promotions.controller(),
        ]
    }

    /// True while any client has a request in flight.
    pub fn is_busy(&self) -> bool {
        self.controllers().iter().any(|c| c.is_loading())
    }

    /// Cancels every in-flight request. Cancelled callers observe
    /// [`ActionError::NetworkInterrupted`](crate::framework::ActionError::NetworkInterrupted).
    pub fn cancel_all(&self) {
        let busy = self.controllers().iter().filter(|c| c.is_loading()).count();
        if busy > 0 {
            warn!(busy, "Cancelling in-flight requests");
        }
        for controller in self.controllers() {
            controller.cancel_action();
        }
    }

    /// Shows the outcome of an operation to the operator and hands it back.
    ///
    /// Action failures go through [`Notifier::report`]; anything else is
    /// shown as a single error line.
    pub fn notify_outcome(
        &self,
        outcome: Result<Value, ClientError>,
        success: impl Into<Message>,
    ) -> Result<Value, ClientError> {
        match &outcome {
            Ok(_) => self.notifier.success(success, NotifyOptions::default()),
            Err(ClientError::Action(err)) => self.notifier.report(err),
            Err(other) => self
                .notifier
                .error(Message::failure(other), NotifyOptions::persistent()),
        }
        outcome
    }
}
