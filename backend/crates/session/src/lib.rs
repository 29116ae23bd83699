//! Session Module
//!
//! Who is signed in, and what a navigation is allowed to render.
//!
//! Layered like the other crates:
//! - `domain/` - User, SessionState, RouteClass, identity provider trait
//! - `application/` - session context, route table, layout gate, auth guard
//! - `infra/` - HTTP and in-memory identity providers
//!
//! ## Flow
//! On every navigation the [`LayoutGate`] reads the pathname and the latest
//! [`SessionState`] snapshot from the [`SessionContext`], consults the
//! [`RouteTable`] and picks exactly one render branch. Protected pages run
//! their own [`AuthGuard`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::SessionConfig;
pub use application::context::SessionContext;
pub use application::gate::{LayoutDecision, LayoutGate};
pub use application::guard::{AuthGuard, GuardState, GuardView};
pub use application::route_table::RouteTable;
pub use domain::{Credentials, IdentityProvider, LoginOutput, RouteClass, SessionState, User};
pub use error::{SessionError, SessionResult};
pub use infra::http_identity::{HttpIdentityConfig, HttpIdentityProvider};
pub use infra::memory::InMemoryIdentityProvider;
