//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Membership System Ports
//!
//! - `MemberDirectory` - Member lookup in the membership system
//! - `MembershipWriter` - Relationship persistence and schema description
//! - `MembershipSystem` - Both of the above, present only when installed

mod member_directory;
mod membership_system;
mod membership_writer;

pub use member_directory::MemberDirectory;
pub use membership_system::MembershipSystem;
pub use membership_writer::MembershipWriter;
