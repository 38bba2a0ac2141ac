//! MemberDash Stripe Bridge - Stripe checkout webhooks into MemberDash memberships
//!
//! This crate receives Stripe `checkout.session.completed` events and creates
//! the matching MemberDash membership relationship, which MemberDash does not
//! do on its own.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
