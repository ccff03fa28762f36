//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter that
//! hides the module prefix (`with_target(false)`) and reads its filter from
//! `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Requests**: one `action` span per settlement with `resource`, `kind` and `seq`
//! - **Outcomes**: success, rejection, HTTP failures and cancellations
//! - **Overlaps**: ignored invocations while a request is in flight, at debug
//! - **Notifications**: every message shown to the operator, through [`TracingSink`](crate::notify::TracingSink)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Outcomes and notifications only
//! RUST_LOG=info lifecycle-actions build --project dev
//!
//! # Full request bodies at the client entry points
//! RUST_LOG=debug lifecycle-actions create-project --label dev --name Dev
//!
//! # Only the controller
//! RUST_LOG=lifecycle_actions::framework=trace lifecycle-actions promote --project dev --environment test
//! ```
//!
//! With `RUST_LOG=debug`, the client methods log their payload **once** at entry:
//!
//! ```rust,ignore
//! debug!(?project, "create_project called");
//! ```
//!
//! ```text
//! DEBUG create_project: create_project called label=dev project=ProjectProperties { label: "dev", name: "Dev", description: None }
//! DEBUG create_project: Action issued resource="projects" kind=create url=/rhn/manager/api/contentmanagement/projects seq=1
//! INFO action: Action ok resource="projects" kind=create seq=1 url=/rhn/manager/api/contentmanagement/projects
//! INFO Project 'dev' created severity=success dismiss_after_ms=Some(6000)
//! ```

/// Installs the global subscriber. Call once, from the binary.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
