//! Domain Layer
//!
//! Entities, value objects and the identity provider trait.

pub mod identity;
pub mod route_class;
pub mod session_state;
pub mod user;

// Re-exports
pub use identity::{Credentials, IdentityProvider, LocalIdentityProvider, LoginOutput};
pub use route_class::RouteClass;
pub use session_state::SessionState;
pub use user::{AuthMethod, User, UserRole};
