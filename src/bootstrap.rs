//! Wiring from configuration to a running router.

use std::sync::Arc;

use axum::Router;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::adapters::http::{host_router, with_webhook_interception, WebhookEndpoint, WebhookState};
use crate::adapters::{InMemoryMembershipStore, PostgresMembershipStore};
use crate::application::HandleCheckoutWebhookHandler;
use crate::config::{AppConfig, MembershipBackend, MembershipConfig, WebhookConfig};
use crate::domain::foundation::DomainError;
use crate::domain::membership::StripeWebhookVerifier;
use crate::ports::MembershipSystem;

/// Builds the signature verifier, or `None` when no secret is configured.
pub fn build_verifier(config: &WebhookConfig) -> Option<StripeWebhookVerifier> {
    let secret = config.signing_secret()?.clone();
    let verifier = StripeWebhookVerifier::new(secret);

    Some(match config.signature_tolerance_secs {
        Some(tolerance) => {
            verifier.with_tolerance(i64::try_from(tolerance).unwrap_or(i64::MAX))
        }
        None => verifier,
    })
}

/// Builds the configured membership system, or `None` when disabled.
///
/// # Errors
///
/// Returns `DatabaseError` if the PostgreSQL pool cannot be configured.
pub fn build_membership_system(
    config: &MembershipConfig,
) -> Result<Option<MembershipSystem>, DomainError> {
    match config.backend {
        MembershipBackend::Disabled => Ok(None),
        MembershipBackend::Memory => {
            let store = Arc::new(InMemoryMembershipStore::new());
            Ok(Some(MembershipSystem::new(store.clone(), store)))
        }
        MembershipBackend::Postgres => {
            let url = config.database_url.as_deref().unwrap_or_default();
            let store = Arc::new(PostgresMembershipStore::connect_lazy(
                url,
                config.max_connections,
            )?);
            Ok(Some(MembershipSystem::new(store.clone(), store)))
        }
    }
}

/// Builds the middleware state from webhook configuration and a membership system.
pub fn build_webhook_state(
    config: &WebhookConfig,
    membership: Option<MembershipSystem>,
) -> WebhookState {
    let handler = HandleCheckoutWebhookHandler::new(build_verifier(config), membership);

    WebhookState {
        handler: Arc::new(handler),
        endpoint: WebhookEndpoint::new(&config.endpoint_param, &config.endpoint_value),
        max_body_bytes: config.max_body_bytes,
    }
}

/// Builds the complete application router.
///
/// # Errors
///
/// Returns `DatabaseError` if the membership backend cannot be built.
pub fn build_router(config: &AppConfig) -> Result<Router, DomainError> {
    let membership = build_membership_system(&config.membership)?;
    let state = build_webhook_state(&config.webhook, membership);

    Ok(with_webhook_interception(host_router(), state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http()))
}
