//! Membership adapters - implementations of the membership system ports.
//!
//! - `InMemoryMembershipStore` - Development/testing store with configurable record shapes

mod in_memory;

pub use in_memory::{InMemoryMembershipStore, RecordShape};
