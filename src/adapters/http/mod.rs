//! HTTP adapters - axum integration.

pub mod webhook;

// Re-export key types for convenience
pub use webhook::{host_router, with_webhook_interception, WebhookEndpoint, WebhookState};
