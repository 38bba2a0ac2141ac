//! PostgreSQL adapters - Database implementations for the membership system ports.
//!
//! - `PostgresMembershipStore` - MemberDash member lookup and relationship writes

mod membership_store;

pub use membership_store::PostgresMembershipStore;
