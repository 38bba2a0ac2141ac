//! Membership system configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Which membership system the bridge writes to
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MembershipBackend {
    /// Process-local store, for development
    #[default]
    Memory,
    /// MemberDash tables in PostgreSQL
    Postgres,
    /// No membership system installed
    Disabled,
}

/// Membership system configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipConfig {
    #[serde(default)]
    pub backend: MembershipBackend,

    /// PostgreSQL connection URL, required for the postgres backend
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum connections allowed
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl MembershipConfig {
    /// Validate membership configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend != MembershipBackend::Postgres {
            return Ok(());
        }

        let url = self
            .database_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ValidationError::MissingRequired("DATABASE_URL"))?;
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > 100 {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            backend: MembershipBackend::default(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}
