//! Infrastructure Layer
//!
//! Identity provider implementations.

pub mod http_identity;
pub mod memory;

pub use http_identity::{HttpIdentityConfig, HttpIdentityProvider};
pub use memory::InMemoryIdentityProvider;
