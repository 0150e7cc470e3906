//! Ambient plumbing shared by YaMDb binaries: configuration, tracing,
//! request-id/trace middleware, health handlers and serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
