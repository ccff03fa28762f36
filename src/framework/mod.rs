//! Single-flight request controller for lifecycle actions.
//!
//! This module provides the building blocks for issuing mutation requests
//! against content-management resources and classifying their outcome.
//!
//! # Main Components
//!
//! - [`ActionRequestController`] - Owns loading state and the in-flight request
//! - [`Transport`] - The network capability the controller consumes
//! - [`ActionError`] - The error taxonomy handed to callers
//! - [`url::build`] - Endpoint path construction
//!
//! # Testing
//!
//! See [`mock`] module for transports and sinks that run without a server.

pub mod core;
pub mod error;
pub mod mock;
pub mod transport;
pub mod url;

// Re-export core types for convenience
pub use self::core::*;
pub use error::*;
pub use transport::*;
