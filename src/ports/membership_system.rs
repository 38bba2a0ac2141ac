//! The membership system as a whole: a directory plus a writer.

use std::sync::Arc;

use super::{MemberDirectory, MembershipWriter};

/// Handle on an installed, available membership system.
///
/// Absence of this value (an `Option::None` at the call site) means the
/// membership system is not installed.
#[derive(Clone)]
pub struct MembershipSystem {
    pub directory: Arc<dyn MemberDirectory>,
    pub writer: Arc<dyn MembershipWriter>,
}

impl MembershipSystem {
    pub fn new(directory: Arc<dyn MemberDirectory>, writer: Arc<dyn MembershipWriter>) -> Self {
        Self { directory, writer }
    }
}

impl std::fmt::Debug for MembershipSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipSystem").finish_non_exhaustive()
    }
}
