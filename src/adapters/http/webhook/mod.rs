//! HTTP adapter for the Stripe checkout webhook.
//!
//! - `POST <any path>?memberdash_stripe_webhook=1` - Handle Stripe webhooks
//! - `GET /health` - Liveness check

pub mod dto;
pub mod middleware;
pub mod routes;

pub use dto::{WebhookReply, WebhookResponse, WebhookResponseData};
pub use middleware::{checkout_webhook_middleware, WebhookEndpoint, WebhookState};
pub use routes::{host_router, with_webhook_interception};
