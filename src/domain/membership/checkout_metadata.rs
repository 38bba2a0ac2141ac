//! Checkout session metadata written by MemberDash when it creates a
//! Stripe checkout.
//!
//! Stripe metadata values are strings. MemberDash marks its sessions with
//! `is_memberdash = "true"` and stores the buyer and the purchased plan as
//! `member_id` / `membership_id`.

use serde_json::{Map, Value};

use crate::domain::foundation::{MemberId, MembershipPlanId};

/// Metadata key marking a checkout as created by MemberDash.
pub const PROVENANCE_KEY: &str = "is_memberdash";

/// The only value of [`PROVENANCE_KEY`] that counts as a MemberDash checkout.
pub const PROVENANCE_MARKER: &str = "true";

/// Metadata key holding the member identifier.
pub const MEMBER_ID_KEY: &str = "member_id";

/// Metadata key holding the membership plan identifier.
pub const MEMBERSHIP_ID_KEY: &str = "membership_id";

/// Borrowed view over a checkout session's metadata map.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutMetadata<'a> {
    entries: Option<&'a Map<String, Value>>,
}

impl<'a> CheckoutMetadata<'a> {
    /// Wraps the metadata map; `None` behaves like an empty map.
    pub fn new(entries: Option<&'a Map<String, Value>>) -> Self {
        Self { entries }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.entries.and_then(|entries| entries.get(key))
    }

    /// Returns true when the checkout was created by MemberDash.
    pub fn is_memberdash(&self) -> bool {
        matches!(self.get(PROVENANCE_KEY), Some(Value::String(flag)) if flag == PROVENANCE_MARKER)
    }

    /// Member identifier, or `None` when missing or zero.
    pub fn member_id(&self) -> Option<MemberId> {
        MemberId::new(coerce_identifier(self.get(MEMBER_ID_KEY))).ok()
    }

    /// Membership plan identifier, or `None` when missing or zero.
    pub fn membership_id(&self) -> Option<MembershipPlanId> {
        MembershipPlanId::new(coerce_identifier(self.get(MEMBERSHIP_ID_KEY))).ok()
    }

    /// Both identifiers, or `None` if either is missing.
    pub fn identifiers(&self) -> Option<(MemberId, MembershipPlanId)> {
        Some((self.member_id()?, self.membership_id()?))
    }
}

/// Coerces a metadata value to a non-negative integer.
///
/// Strings are read leniently: leading whitespace is skipped, one sign is
/// allowed, and the leading run of digits is used. The absolute value is
/// returned and overlong digit runs saturate. Numbers are truncated.
/// Anything else is 0.
pub fn coerce_identifier(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::String(s)) => coerce_str(s),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_i64().map(i64::unsigned_abs))
            .or_else(|| n.as_f64().map(|f| f.abs().trunc() as u64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn coerce_str(s: &str) -> u64 {
    let trimmed = s.trim_start();
    let digits = trimmed
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(trimmed);

    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, b| {
            acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        })
}
