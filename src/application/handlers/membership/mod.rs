//! Membership handlers.
//!
//! ## Commands
//! - Processing Stripe checkout webhooks into MemberDash relationships

mod handle_checkout_webhook;

pub use handle_checkout_webhook::{
    CreateRelationshipResult, HandleCheckoutWebhookCommand, HandleCheckoutWebhookHandler,
    WebhookOutcome,
};
