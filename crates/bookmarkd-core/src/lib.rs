//! Shared service plumbing: configuration, tracing, health checks, middleware.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
