//! PostgreSQL implementation of the membership system ports.
//!
//! Reads and writes MemberDash's own tables:
//!
//! ```text
//! memberdash_members(id BIGINT PRIMARY KEY, ...)
//! memberdash_membership_relationships(
//!     id BIGSERIAL PRIMARY KEY,
//!     user_id BIGINT NOT NULL,
//!     membership_id BIGINT NOT NULL,
//!     status TEXT NOT NULL,
//!     started_at TIMESTAMPTZ NULL,
//!     created_at TIMESTAMPTZ NOT NULL
//! )
//! ```

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, MembershipPlanId};
use crate::domain::membership::{
    Capability, MemberRecord, MembershipRelationship, RelationshipSchema, ACTIVE_STATUS_FALLBACK,
};
use crate::ports::{MemberDirectory, MembershipWriter};

/// PostgreSQL implementation of `MemberDirectory` and `MembershipWriter`.
pub struct PostgresMembershipStore {
    pool: PgPool,
}

impl PostgresMembershipStore {
    /// Creates a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool lazily; no connection is made until the first query.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)
            .map_err(|e| {
                DomainError::database(format!("Invalid database configuration: {}", e))
            })?;
        Ok(Self::new(pool))
    }
}

/// Member record backed by the relationship table.
///
/// This schema version exposes the id list but no direct predicate.
struct PostgresMemberRecord {
    id: MemberId,
    plans: Vec<MembershipPlanId>,
}

impl MemberRecord for PostgresMemberRecord {
    fn member_id(&self) -> MemberId {
        self.id
    }

    fn membership_ids(&self) -> Capability<Vec<MembershipPlanId>> {
        Capability::Supported(self.plans.clone())
    }
}

fn to_db_id(id: u64, field: &str) -> Result<i64, DomainError> {
    i64::try_from(id).map_err(|_| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            format!("{} out of range for BIGINT: {}", field, id),
        )
    })
}

/// Converts stored plan ids, dropping any that are not valid plan ids.
fn plans_from_rows(rows: Vec<(i64,)>) -> Vec<MembershipPlanId> {
    rows.into_iter()
        .filter_map(|(id,)| u64::try_from(id).ok())
        .filter_map(|id| MembershipPlanId::new(id).ok())
        .collect()
}

/// Builds the record for a member.
///
/// Relationship rows count even without a `memberdash_members` row, so a
/// redelivered event for such a member is still seen as a duplicate.
fn member_record(
    id: MemberId,
    has_member_row: bool,
    rows: Vec<(i64,)>,
) -> Option<PostgresMemberRecord> {
    if !has_member_row && rows.is_empty() {
        return None;
    }
    Some(PostgresMemberRecord {
        id,
        plans: plans_from_rows(rows),
    })
}

#[async_trait]
impl MemberDirectory for PostgresMembershipStore {
    async fn find_member(
        &self,
        id: MemberId,
    ) -> Result<Option<Box<dyn MemberRecord>>, DomainError> {
        let db_id = to_db_id(id.as_u64(), "member_id")?;

        let member: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM memberdash_members WHERE id = $1
            "#,
        )
        .bind(db_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find member: {}", e)))?;


        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT membership_id
            FROM memberdash_membership_relationships
            WHERE user_id = $1 AND status = $2
            "#,
        )
        .bind(db_id)
        .bind(ACTIVE_STATUS_FALLBACK)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load memberships: {}", e)))?;

        Ok(member_record(id, member.is_some(), rows)
            .map(|record| Box::new(record) as Box<dyn MemberRecord>))
    }
}

#[async_trait]
impl MembershipWriter for PostgresMembershipStore {
    fn schema(&self) -> RelationshipSchema {
        RelationshipSchema {
            tracks_started_at: true,
            active_status: Some(ACTIVE_STATUS_FALLBACK.to_string()),
            can_save: true,
        }
    }

    async fn save(&self, relationship: &MembershipRelationship) -> Result<(), DomainError> {
        let user_id = to_db_id(relationship.member_id.as_u64(), "member_id")?;
        let membership_id = to_db_id(relationship.membership_id.as_u64(), "membership_id")?;

        sqlx::query(
            r#"
            INSERT INTO memberdash_membership_relationships (
                user_id, membership_id, status, started_at, created_at
            ) VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(user_id)
        .bind(membership_id)
        .bind(relationship.status.as_str())
        .bind(relationship.started_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to save membership relationship: {}", e))
        })?;

        Ok(())
    }
}
