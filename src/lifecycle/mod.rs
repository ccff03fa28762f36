//! # System Lifecycle & Wiring
//!
//! Turns a [`ClientConfig`] into a ready-to-use [`ContentManagementSystem`]:
//!
//! 1. **Configuration** - TOML file, environment overrides, validation ([`config`])
//! 2. **Transport** - one shared `reqwest` client for every resource
//! 3. **Clients** - one controller per resource, so each stays single-flight
//! 4. **Notifications** - outcomes shown through a [`NotificationSink`](crate::notify::NotificationSink)
//! 5. **Observability** - subscriber setup in [`tracing`]
//!
//! ```rust,ignore
//! setup_tracing();
//! let config = ClientConfig::load(None)?;
//! let system = ContentManagementSystem::new(&config)?;
//!
//! let outcome = system.builds.build(&request).await;
//! system.notify_outcome(outcome, "Build started")?;
//! ```
//!
//! Tests swap the transport and sink through
//! [`ContentManagementSystem::with_parts`].

pub mod config;
pub mod content_system;
pub mod tracing;

pub use config::{ClientConfig, ConfigError, NotificationConfig};
pub use content_system::{ContentManagementSystem, SystemError};
