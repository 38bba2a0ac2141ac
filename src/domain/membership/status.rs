//! Relationship status values.
//!
//! MemberDash stores the status as text and its versions disagree on the
//! exact vocabulary, so the bridge carries the string the membership system
//! declares and falls back to `"active"`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status literal used when the membership system declares none.
pub const ACTIVE_STATUS_FALLBACK: &str = "active";

/// Status of a membership relationship, as understood by the membership system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipStatus(String);

impl RelationshipStatus {
    /// A status as stored by the membership system.
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    /// The active status, using the declared value when there is one.
    pub fn active(declared: Option<&str>) -> Self {
        let status = declared
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(ACTIVE_STATUS_FALLBACK);
        Self(status.to_string())
    }

    /// Returns the status text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
