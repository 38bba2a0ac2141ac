//! Stripe webhook event envelope.
//!
//! Decodes only what the bridge needs from a Stripe event: the type tag and
//! the nested `data.object`. Everything else Stripe sends is optional here
//! and kept for logging.

use serde_json::Value;

use super::webhook_errors::EnvelopeError;

/// Stripe webhook event (simplified).
#[derive(Debug, Clone, PartialEq)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format), when present.
    pub id: Option<String>,

    /// Type of event (e.g., "checkout.session.completed").
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp), when present.
    pub created: Option<i64>,

    /// Whether this is a live mode event, when present.
    pub livemode: Option<bool>,

    /// The object that triggered the event; `Value::Null` when absent.
    pub object: Value,
}

impl StripeEvent {
    /// Decodes an event envelope from a raw request body.
    ///
    /// # Errors
    ///
    /// - `EnvelopeError::Empty` for an empty body
    /// - `EnvelopeError::Malformed` when the body is not a JSON object
    /// - `EnvelopeError::MissingType` when there is no string `type` field
    pub fn from_slice(payload: &[u8]) -> Result<Self, EnvelopeError> {
        if payload.is_empty() {
            return Err(EnvelopeError::Empty);
        }

        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| EnvelopeError::Malformed(e.to_string()))?;

        let Value::Object(mut envelope) = value else {
            return Err(EnvelopeError::Malformed("envelope is not an object".to_string()));
        };

        let event_type = match envelope.get("type") {
            Some(Value::String(t)) => t.clone(),
            _ => return Err(EnvelopeError::MissingType),
        };

        let object = envelope
            .get_mut("data")
            .and_then(|data| data.get_mut("object"))
            .map(Value::take)
            .unwrap_or(Value::Null);

        Ok(StripeEvent {
            id: envelope.get("id").and_then(Value::as_str).map(str::to_string),
            event_type,
            created: envelope.get("created").and_then(Value::as_i64),
            livemode: envelope.get("livemode").and_then(Value::as_bool),
            object,
        })
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::from_type_tag(&self.event_type)
    }

    /// Returns the `metadata` map of the event object, if it has one.
    pub fn metadata(&self) -> Option<&serde_json::Map<String, Value>> {
        self.object.get("metadata").and_then(Value::as_object)
    }
}

/// Stripe event types the bridge distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// Checkout session completed successfully.
    CheckoutSessionCompleted,
    /// Any other event type; passed through untouched.
    Unknown,
}

impl StripeEventType {
    /// Parse event type from the envelope's type tag.
    pub fn from_type_tag(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            _ => Self::Unknown,
        }
    }
}
