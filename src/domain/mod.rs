//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `membership` - Stripe checkout events and MemberDash relationships

pub mod foundation;
pub mod membership;
