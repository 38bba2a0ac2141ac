//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod membership;

pub use membership::{
    CreateRelationshipResult, HandleCheckoutWebhookCommand, HandleCheckoutWebhookHandler,
    WebhookOutcome,
};
