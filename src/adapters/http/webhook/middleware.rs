//! Checkout webhook interception middleware for axum.
//!
//! The bridge sits in front of the host application and claims requests
//! addressed to it by query parameter rather than by path:
//!
//! ```text
//! Request → checkout_webhook_middleware ─┬─ claimed  → WebhookReply
//!                                        └─ otherwise → host router
//! ```
//!
//! A claimed request whose body turns out not to be a checkout completion
//! is handed to the host with its body intact.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Query, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::dto::{WebhookReply, WebhookResponse};
use crate::application::{HandleCheckoutWebhookCommand, HandleCheckoutWebhookHandler};
use crate::domain::membership::SIGNATURE_HEADER;

/// The query parameter that addresses the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEndpoint {
    pub param: String,
    pub value: String,
}

impl WebhookEndpoint {
    pub fn new(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            value: value.into(),
        }
    }

    /// True for a `POST` carrying `param=value` in its query string.
    pub fn matches(&self, request: &Request) -> bool {
        if request.method() != Method::POST {
            return false;
        }

        Query::<HashMap<String, String>>::try_from_uri(request.uri())
            .map(|Query(params)| params.get(&self.param) == Some(&self.value))
            .unwrap_or(false)
    }
}

impl Default for WebhookEndpoint {
    fn default() -> Self {
        Self::new("memberdash_stripe_webhook", "1")
    }
}

/// Middleware state.
#[derive(Clone)]
pub struct WebhookState {
    pub handler: Arc<HandleCheckoutWebhookHandler>,
    pub endpoint: WebhookEndpoint,
    pub max_body_bytes: usize,
}

/// Intercepts checkout webhook requests ahead of the host router.
///
/// Non-matching requests, and matching requests the handler passes on,
/// continue to `next`. A body that exceeds `max_body_bytes` or fails to
/// read is treated as empty.
pub async fn checkout_webhook_middleware(
    State(state): State<WebhookState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.endpoint.matches(&request) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let payload = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to buffer webhook body, treating as empty");
            Bytes::new()
        }
    };

    let signature = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandleCheckoutWebhookCommand {
        payload: payload.to_vec(),
        signature,
    };

    let outcome = state.handler.handle(cmd).await;

    match WebhookResponse::from_outcome(&outcome) {
        Some((status, response)) => WebhookReply(status, response).into_response(),
        None => next.run(Request::from_parts(parts, Body::from(payload))).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, uri: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn endpoint_matches_post_with_param() {
        let endpoint = WebhookEndpoint::default();
        assert!(endpoint.matches(&request(Method::POST, "/?memberdash_stripe_webhook=1")));
        assert!(endpoint.matches(&request(
            Method::POST,
            "/any/path?foo=bar&memberdash_stripe_webhook=1"
        )));
    }

    #[test]
    fn endpoint_rejects_other_methods() {
        let endpoint = WebhookEndpoint::default();
        assert!(!endpoint.matches(&request(Method::GET, "/?memberdash_stripe_webhook=1")));
        assert!(!endpoint.matches(&request(Method::PUT, "/?memberdash_stripe_webhook=1")));
    }

    #[test]
    fn endpoint_rejects_missing_or_wrong_value() {
        let endpoint = WebhookEndpoint::default();
        assert!(!endpoint.matches(&request(Method::POST, "/")));
        assert!(!endpoint.matches(&request(Method::POST, "/?memberdash_stripe_webhook=0")));
        assert!(!endpoint.matches(&request(Method::POST, "/?other=1")));
    }

    #[test]
    fn endpoint_is_configurable() {
        let endpoint = WebhookEndpoint::new("hook", "stripe");
        assert!(endpoint.matches(&request(Method::POST, "/?hook=stripe")));
        assert!(!endpoint.matches(&request(Method::POST, "/?memberdash_stripe_webhook=1")));
    }
}
