//! Webhook configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Webhook configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Stripe webhook signing secret; signature checks are skipped without one
    #[serde(default)]
    pub stripe_webhook_secret: Option<SecretString>,

    /// Query parameter that addresses the bridge
    #[serde(default = "default_endpoint_param")]
    pub endpoint_param: String,

    /// Value the query parameter must carry
    #[serde(default = "default_endpoint_value")]
    pub endpoint_value: String,

    /// Largest webhook body buffered, in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Replay window in seconds; unset disables the timestamp check
    #[serde(default)]
    pub signature_tolerance_secs: Option<u64>,
}

impl WebhookConfig {
    /// The signing secret, treating an empty value as absent.
    pub fn signing_secret(&self) -> Option<&SecretString> {
        self.stripe_webhook_secret
            .as_ref()
            .filter(|s| !s.expose_secret().is_empty())
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(secret) = self.signing_secret() {
            if !secret.expose_secret().starts_with("whsec_") {
                return Err(ValidationError::InvalidStripeWebhookSecret);
            }
        }
        if self.endpoint_param.trim().is_empty() {
            return Err(ValidationError::InvalidEndpoint);
        }
        if self.max_body_bytes == 0 {
            return Err(ValidationError::InvalidBodyLimit);
        }
        if self.signature_tolerance_secs == Some(0) {
            return Err(ValidationError::InvalidSignatureTolerance);
        }
        Ok(())
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            stripe_webhook_secret: None,
            endpoint_param: default_endpoint_param(),
            endpoint_value: default_endpoint_value(),
            max_body_bytes: default_max_body_bytes(),
            signature_tolerance_secs: None,
        }
    }
}

fn default_endpoint_param() -> String {
    "memberdash_stripe_webhook".to_string()
}

fn default_endpoint_value() -> String {
    "1".to_string()
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}
