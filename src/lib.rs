//! # Lifecycle Actions
//!
//! > **Single-flight action requests for the content lifecycle management API.**
//!
//! Every resource of the content-management REST API (projects, environments,
//! software sources, filters, builds, promotions) is driven through an
//! [`ActionRequestController`](framework::ActionRequestController): one request
//! at a time, cancellable, with every failure classified into an
//! [`ActionError`](framework::ActionError) and shown to the operator as notifications.
//!
//! ## Core Concepts
//!
//! ### Single flight
//! A controller tracks at most one pending request. Invoking an action while one
//! is loading returns an ignored [`ActionFuture`](framework::ActionFuture) that
//! never settles and never reaches the transport.
//!
//! ### Settlement
//! Each issued request is awaited by a spawned task that classifies the outcome,
//! returns the controller to idle and then resolves the caller. Dropping the
//! returned future does not leave the controller stuck in loading.
//!
//! ### Mocking
//! The transport is a trait object, so tests run without a server.
//! See [`framework::mock`] for `MockTransport`, `channel_transport` and `RecordingSink`.
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: controller, URL building, transport contract, error taxonomy.
//! - **Key items**: [`ActionRequestController`](framework::ActionRequestController),
//!   [`Transport`](framework::Transport), [`ActionKind`](framework::ActionKind).
//!
//! ### 2. The Interface ([`clients`])
//! - **Role**: one typed client per resource on top of the shared
//!   [`ActionClient`](clients::ActionClient) trait.
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! - **Role**: configuration, tracing setup and the
//!   [`ContentManagementSystem`](lifecycle::ContentManagementSystem) that wires it all.
//!
//! ### 4. Adapters ([`http`], [`notify`])
//! - **Role**: the `reqwest` transport and the notification surface.
//!
//! ### 5. Payloads ([`model`])
//! - **Role**: camelCase request bodies for each action.
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -- --server https://suma.example.com build --project dev
//! ```
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod framework;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod notify;
