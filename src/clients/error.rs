//! Error type shared by the resource clients.

use thiserror::Error;

use crate::framework::{ActionError, DescriptorError};

/// Errors that can occur while running a client operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The server rejected the action or it never completed.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// The client was built for an invalid resource.
    #[error("Invalid resource: {0}")]
    Descriptor(#[from] DescriptorError),
}

impl ClientError {
    /// The classified action failure, if that is what this is.
    pub fn action(&self) -> Option<&ActionError> {
        match self {
            ClientError::Action(err) => Some(err),
            _ => None,
        }
    }
}
