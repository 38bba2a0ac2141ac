//! Membership domain module.
//!
//! Turns a Stripe checkout event into a MemberDash membership relationship.
//!
//! # Module Structure
//!
//! - `stripe_event` - Stripe event envelope decoding
//! - `checkout_metadata` - MemberDash provenance flag and identifiers
//! - `webhook_verifier` - `Stripe-Signature` verification
//! - `capability` / `member_record` - existing-membership check
//! - `relationship` / `status` - the record the bridge creates

mod capability;
mod checkout_metadata;
mod member_record;
mod relationship;
mod status;
mod stripe_event;
mod webhook_errors;
mod webhook_verifier;

pub use capability::Capability;
pub use checkout_metadata::{coerce_identifier, CheckoutMetadata};
pub use member_record::{already_holds, MemberRecord};
pub use relationship::{MembershipRelationship, RelationshipSchema};
pub use status::{RelationshipStatus, ACTIVE_STATUS_FALLBACK};
pub use stripe_event::{StripeEvent, StripeEventType};
pub use webhook_errors::{EnvelopeError, SignatureError};
pub use webhook_verifier::{
    check_signature, compute_signature, verify, SignatureHeader, StripeWebhookVerifier,
    SIGNATURE_HEADER,
};
