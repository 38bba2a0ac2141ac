//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum webhook interception and host router
//! - `membership` - In-memory membership system
//! - `postgres` - MemberDash tables in PostgreSQL

pub mod http;
pub mod membership;
pub mod postgres;

pub use membership::{InMemoryMembershipStore, RecordShape};
pub use postgres::PostgresMembershipStore;
