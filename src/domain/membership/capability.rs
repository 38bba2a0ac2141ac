//! Optional capabilities of the external membership system.
//!
//! Different MemberDash versions expose different query methods on their
//! member objects. Adapters report what their version offers through
//! [`Capability`] instead of the caller probing for methods.

/// Result of asking a membership system for an optional capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability<T> {
    /// The capability exists and produced a value.
    Supported(T),
    /// This membership system version does not offer the capability.
    Unsupported,
}
