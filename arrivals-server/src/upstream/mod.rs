//! HTTP client for delegating lookups to a core node.
//!
//! A public node holds no feed of its own. For each stop it asks the core
//! node's `/api/v1/arrivals` route for the single-stop body, passing the
//! shared secret along. Every request is bounded by a timeout and made
//! exactly once; retrying is left to callers.

mod client;
mod error;

pub use client::{UpstreamClient, UpstreamConfig};
pub use error::UpstreamError;
