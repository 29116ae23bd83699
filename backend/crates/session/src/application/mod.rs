//! Application Layer
//!
//! Session context, route classification, layout gate and auth guard.

pub mod config;
pub mod context;
pub mod gate;
pub mod guard;
pub mod intent;
pub mod route_table;

// Re-exports
pub use config::SessionConfig;
pub use context::SessionContext;
pub use gate::{LayoutDecision, LayoutGate};
pub use guard::{AuthGuard, GuardState, GuardView};
pub use route_table::RouteTable;
