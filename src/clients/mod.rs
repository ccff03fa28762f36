//! Typed clients, one per content-management resource, each wrapping an
//! [`ActionRequestController`](crate::framework::ActionRequestController).

pub mod action_client;
pub mod build_client;
pub mod environment_client;
pub mod error;
pub mod filter_client;
pub mod project_client;

pub use action_client::*;
pub use build_client::*;
pub use environment_client::*;
pub use error::*;
pub use filter_client::*;
pub use project_client::*;
