//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the frontend core:
//! - Durable client storage (in-memory, cookie jar)
//! - Cookie building and parsing
//! - HTTP client construction for upstream services

pub mod cookie;
pub mod http_client;
pub mod storage;

pub use storage::{ClientStorage, StorageError, StorageResult, keys};
