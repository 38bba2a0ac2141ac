//! Stripe webhook signature verification.
//!
//! Implements verification of the `Stripe-Signature` header using
//! HMAC-SHA256 over `"{t}.{payload}"`. Only the first `v1` entry is checked,
//! and the timestamp is not checked for freshness unless a tolerance is
//! configured on [`StripeWebhookVerifier`].

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::webhook_errors::SignatureError;
use crate::domain::foundation::Timestamp;

/// Name of the header carrying the signature.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Maximum allowed clock skew for future events, when a tolerance is set.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
///
/// Both fields borrow from the header; the timestamp is kept verbatim
/// because it is signed as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureHeader<'a> {
    /// Value of the first `t` entry.
    pub timestamp: &'a str,
    /// Value of the first `v1` entry.
    pub v1_signature: &'a str,
}

impl<'a> SignatureHeader<'a> {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...]`
    ///
    /// Parts without `=` and unknown keys are skipped. Later duplicates of
    /// `t` and `v1` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SignatureError::MalformedHeader` if `t` or `v1` is missing
    /// or empty.
    pub fn parse(header: &'a str) -> Result<Self, SignatureError> {
        let mut timestamp: Option<&'a str> = None;
        let mut v1_signature: Option<&'a str> = None;

        for part in header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };

            match key.trim() {
                "t" if timestamp.is_none() => timestamp = Some(value.trim()),
                "v1" if v1_signature.is_none() => v1_signature = Some(value.trim()),
                _ => {}
            }
        }

        let timestamp = timestamp
            .filter(|t| !t.is_empty())
            .ok_or(SignatureError::MalformedHeader("t"))?;
        let v1_signature = v1_signature
            .filter(|v| !v.is_empty())
            .ok_or(SignatureError::MalformedHeader("v1"))?;

        Ok(SignatureHeader {
            timestamp,
            v1_signature,
        })
    }
}

/// Computes the lowercase hex HMAC-SHA256 of `"{timestamp}.{payload}"`.
///
/// The payload is signed byte-for-byte, without any re-encoding.
pub fn compute_signature(
    secret: &[u8],
    timestamp: &str,
    payload: &[u8],
) -> Result<String, SignatureError> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks a signature header against the payload and secret.
///
/// # Errors
///
/// - `MalformedHeader` - header lacks `t` or `v1`
/// - `Mismatch` - computed signature differs from `v1`
pub fn check_signature<'h>(
    payload: &[u8],
    signature_header: &'h str,
    secret: &[u8],
) -> Result<SignatureHeader<'h>, SignatureError> {
    let header = SignatureHeader::parse(signature_header)?;
    let expected = compute_signature(secret, header.timestamp, payload)?;

    if !constant_time_compare(expected.as_bytes(), header.v1_signature.as_bytes()) {
        return Err(SignatureError::Mismatch);
    }

    Ok(header)
}

/// Returns true when `signature_header` carries a valid `v1` signature of
/// `payload` under `secret`.
pub fn verify(payload: &[u8], signature_header: &str, secret: &[u8]) -> bool {
    check_signature(payload, signature_header, secret).is_ok()
}

/// Verifier for Stripe webhook signatures, bound to the configured secret.
#[derive(Clone)]
pub struct StripeWebhookVerifier {
    /// The webhook signing secret from the Stripe dashboard.
    secret: SecretString,
    /// Optional replay window in seconds.
    tolerance_secs: Option<i64>,
}

impl StripeWebhookVerifier {
    /// Creates a verifier that checks signatures only.
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            tolerance_secs: None,
        }
    }

    /// Additionally rejects signatures older than `tolerance_secs`.
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = Some(tolerance_secs);
        self
    }

    /// Verifies the header of a request received now.
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<(), SignatureError> {
        self.verify_at(payload, signature_header, Timestamp::now())
    }

    /// Verifies the header of a request received at `now`.
    ///
    /// # Errors
    ///
    /// - `MissingHeader` - no signature header
    /// - `MalformedHeader` / `Mismatch` - see [`check_signature`]
    /// - `TimestampOutOfRange` / `InvalidTimestamp` - only with a tolerance
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
        now: Timestamp,
    ) -> Result<(), SignatureError> {
        let signature_header = signature_header.ok_or(SignatureError::MissingHeader)?;
        let header = check_signature(
            payload,
            signature_header,
            self.secret.expose_secret().as_bytes(),
        )?;

        if let Some(tolerance) = self.tolerance_secs {
            validate_timestamp(header.timestamp, tolerance, now)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for StripeWebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeWebhookVerifier")
            .field("secret", &"[REDACTED]")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

/// Validates that the signed timestamp lies within the replay window.
fn validate_timestamp(
    timestamp: &str,
    tolerance: i64,
    now: Timestamp,
) -> Result<(), SignatureError> {
    let signed_at: i64 = timestamp
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp)?;
    let age = now.as_unix_secs().saturating_sub(signed_at);

    if age > tolerance {
        return Err(SignatureError::TimestampOutOfRange);
    }

    if age < -MAX_CLOCK_SKEW_SECS {
        return Err(SignatureError::InvalidTimestamp);
    }

    Ok(())
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
