//! # Action Errors
//!
//! This module defines the error taxonomy produced by the
//! [`ActionRequestController`](crate::framework::ActionRequestController) when it
//! interprets the outcome of a request. Callers (and the notification layer)
//! pattern match on these three variants; nothing else constructs them.

use std::collections::BTreeMap;

use thiserror::Error;

/// Message used for status `0` outcomes (network failure or user cancellation).
pub const INTERRUPTED_MESSAGE: &str =
    "Request interrupted or invalid response received from the server. Please try again.";

/// Classified failure of a lifecycle action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    /// The request never produced a usable response (status `0`).
    ///
    /// This includes cancellation through
    /// [`cancel_action`](crate::framework::ActionRequestController::cancel_action).
    #[error("{}", INTERRUPTED_MESSAGE)]
    NetworkInterrupted,

    /// HTTP 400, or an HTTP 2xx payload carrying `success: false`.
    #[error("Bad request: {}", .messages.join("; "))]
    BadRequest {
        messages: Vec<String>,
        errors: BTreeMap<String, String>,
    },

    /// Any other non-2xx status.
    #[error("{message}")]
    HttpStatus { code: u16, message: String },
}

impl ActionError {
    /// The HTTP status this error was classified from.
    pub fn status(&self) -> u16 {
        match self {
            ActionError::NetworkInterrupted => 0,
            ActionError::BadRequest { .. } => 400,
            ActionError::HttpStatus { code, .. } => *code,
        }
    }

    /// Field-level validation errors, `None` for non-`BadRequest` variants.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ActionError::BadRequest { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

/// Invalid [`ResourceDescriptor`](crate::framework::ResourceDescriptor) input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("resource name must not be empty")]
    EmptyResource,

    /// A nested resource is only reachable under an item of its parent.
    #[error("'{resource}/{{id}}/{nested}' requires an id")]
    MissingId { resource: String, nested: String },
}
