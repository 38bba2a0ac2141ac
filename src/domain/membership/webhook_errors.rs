//! Error types for Stripe webhook decoding and verification.

use thiserror::Error;

/// Reasons a request body is not a usable event envelope.
///
/// Every variant leads to the request being handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The request body was empty.
    #[error("Empty request body")]
    Empty,

    /// The body was not a JSON object.
    #[error("Malformed envelope: {0}")]
    Malformed(String),

    /// The envelope has no string `type` field.
    #[error("Envelope has no type")]
    MissingType,
}

/// Reasons a `Stripe-Signature` header fails verification.
///
/// Every variant is answered with `400 Invalid Stripe signature`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// No `Stripe-Signature` header on the request.
    #[error("Missing signature header")]
    MissingHeader,

    /// Header lacks a `t` or `v1` component.
    #[error("Malformed signature header: missing {0}")]
    MalformedHeader(&'static str),

    /// Computed signature does not match `v1`.
    #[error("Signature mismatch")]
    Mismatch,

    /// Signature timestamp is older than the configured tolerance.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signature timestamp is unparseable or too far in the future.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// The signing secret could not be used as an HMAC key.
    #[error("Invalid signing key")]
    InvalidKey,
}
