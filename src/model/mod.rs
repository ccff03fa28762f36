//! Request bodies (DTOs) for the content-management actions.

pub mod environment;
pub mod filter;
pub mod project;

pub use environment::*;
pub use filter::*;
pub use project::*;
