use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::clients::action_client::ActionClient;
use crate::clients::ClientError;
use crate::framework::{ActionRequestController, ResourceDescriptor, Transport};
use crate::model::FilterProperties;

/// Client for `/filters`.
#[derive(Clone, Debug)]
pub struct FilterClient {
    controller: ActionRequestController,
}

impl FilterClient {
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let descriptor = ResourceDescriptor::new("filters")?;
        Ok(Self {
            controller: ActionRequestController::new(descriptor, transport),
        })
    }

    #[instrument(skip(self, filter), fields(name = %filter.name, rule = %filter.rule))]
    pub async fn create_filter(&self, filter: &FilterProperties) -> Result<Value, ClientError> {
        debug!(?filter, "create_filter called");
        self.create(filter).await
    }

    #[instrument(skip(self, filter))]
    pub async fn update_filter(
        &self,
        filter_id: &str,
        filter: &FilterProperties,
    ) -> Result<Value, ClientError> {
        self.update(filter_id, filter).await
    }

    pub async fn delete_filter(&self, filter_id: &str) -> Result<Value, ClientError> {
        self.delete(filter_id).await
    }
}

impl ActionClient for FilterClient {
    fn controller(&self) -> &ActionRequestController {
        &self.controller
    }
}
