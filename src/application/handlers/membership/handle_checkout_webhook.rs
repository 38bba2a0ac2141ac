//! HandleCheckoutWebhookHandler - Command handler bridging Stripe checkout
//! completion into MemberDash membership relationships.

use tracing::{debug, error, info, warn};

use crate::domain::foundation::{DomainError, MemberId, MembershipPlanId, Timestamp};
use crate::domain::membership::{
    already_holds, CheckoutMetadata, MembershipRelationship, StripeEvent, StripeEventType,
    StripeWebhookVerifier,
};
use crate::ports::MembershipSystem;

/// Command to handle one inbound webhook request.
#[derive(Debug, Clone)]
pub struct HandleCheckoutWebhookCommand {
    /// Raw request body.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header, if the request carried one.
    pub signature: Option<String>,
}

/// Result of attempting to create a membership relationship.
#[derive(Debug, Clone)]
pub enum CreateRelationshipResult {
    /// The relationship was built and handed to the membership system.
    Created,
    /// The member already holds the plan.
    AlreadyExists,
    /// No membership system is installed.
    Unavailable,
    /// The lookup or the write failed.
    WriteFailed(DomainError),
}

/// What the handler decided for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Not a checkout completion this bridge handles; the host answers.
    PassThrough,
    /// A secret is configured and the signature did not verify.
    InvalidSignature,
    /// The checkout was not started by MemberDash.
    NotMemberDashSession,
    /// `member_id` or `membership_id` missing or zero.
    MissingIdentifiers,
    /// The membership system is not installed.
    MembershipUnavailable,
    /// The member already holds the plan.
    AlreadyMember,
    /// A relationship was created.
    Created {
        member_id: MemberId,
        membership_id: MembershipPlanId,
    },
    /// Lookup or persistence failed; details are in the error log.
    WriteFailed,
}

impl WebhookOutcome {
    /// Whether the bridge answers the request itself.
    pub fn is_handled(&self) -> bool {
        !matches!(self, WebhookOutcome::PassThrough)
    }
}

/// Handler for Stripe `checkout.session.completed` webhooks.
///
/// Verifies the signature when a verifier is configured, then creates the
/// MemberDash relationship named in the checkout metadata unless the member
/// already holds it. Every failure after signature verification resolves to
/// a successful outcome so that Stripe does not retry.
pub struct HandleCheckoutWebhookHandler {
    verifier: Option<StripeWebhookVerifier>,
    membership: Option<MembershipSystem>,
}

impl HandleCheckoutWebhookHandler {
    pub fn new(
        verifier: Option<StripeWebhookVerifier>,
        membership: Option<MembershipSystem>,
    ) -> Self {
        Self {
            verifier,
            membership,
        }
    }

    pub async fn handle(&self, cmd: HandleCheckoutWebhookCommand) -> WebhookOutcome {
        // 1. Decode the envelope; anything unreadable belongs to the host
        let event = match StripeEvent::from_slice(&cmd.payload) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "Not a webhook envelope, passing through");
                return WebhookOutcome::PassThrough;
            }
        };

        if event.parsed_type() != StripeEventType::CheckoutSessionCompleted {
            debug!(event_type = %event.event_type, "Unhandled event type, passing through");
            return WebhookOutcome::PassThrough;
        }

        let event_id = event.id.as_deref().unwrap_or("unknown");

        // 2. Authenticate
        if let Some(verifier) = &self.verifier {
            if let Err(e) = verifier.verify(&cmd.payload, cmd.signature.as_deref()) {
                warn!(event_id, error = %e, "Stripe signature rejected");
                return WebhookOutcome::InvalidSignature;
            }
        }

        // 3. Check provenance and identifiers
        let metadata = CheckoutMetadata::new(event.metadata());
        if !metadata.is_memberdash() {
            info!(event_id, "Checkout not started by MemberDash, ignoring");
            return WebhookOutcome::NotMemberDashSession;
        }

        let Some((member_id, membership_id)) = metadata.identifiers() else {
            info!(event_id, "Checkout metadata lacks member or membership id, ignoring");
            return WebhookOutcome::MissingIdentifiers;
        };

        // 4. Create the relationship
        match self
            .create_relationship(member_id, membership_id, Timestamp::now())
            .await
        {
            CreateRelationshipResult::Created => {
                info!(
                    event_id,
                    event_created = ?event.created,
                    livemode = ?event.livemode,
                    member_id = %member_id,
                    membership_id = %membership_id,
                    "Membership relationship created"
                );
                WebhookOutcome::Created {
                    member_id,
                    membership_id,
                }
            }
            CreateRelationshipResult::AlreadyExists => {
                info!(
                    event_id,
                    member_id = %member_id,
                    membership_id = %membership_id,
                    "Member already holds membership, ignoring"
                );
                WebhookOutcome::AlreadyMember
            }
            CreateRelationshipResult::Unavailable => {
                warn!(event_id, "Membership system not available, ignoring");
                WebhookOutcome::MembershipUnavailable
            }
            CreateRelationshipResult::WriteFailed(e) => {
                error!(
                    event_id,
                    member_id = %member_id,
                    membership_id = %membership_id,
                    error = %e,
                    "Failed to create membership relationship"
                );
                WebhookOutcome::WriteFailed
            }
        }
    }

    /// Creates the relationship unless the member already holds the plan.
    pub async fn create_relationship(
        &self,
        member_id: MemberId,
        membership_id: MembershipPlanId,
        now: Timestamp,
    ) -> CreateRelationshipResult {
        let Some(membership) = &self.membership else {
            return CreateRelationshipResult::Unavailable;
        };

        let member = match membership.directory.find_member(member_id).await {
            Ok(member) => member,
            Err(e) => return CreateRelationshipResult::WriteFailed(e),
        };

        if already_holds(member.as_deref(), membership_id) {
            return CreateRelationshipResult::AlreadyExists;
        }

        let schema = membership.writer.schema();
        let relationship = MembershipRelationship::activate(member_id, membership_id, &schema, now);

        if !schema.can_save {
            warn!(
                member_id = %member_id,
                membership_id = %membership_id,
                "Membership system cannot persist relationships, nothing saved"
            );
            return CreateRelationshipResult::Created;
        }

        match membership.writer.save(&relationship).await {
            Ok(()) => CreateRelationshipResult::Created,
            Err(e) => CreateRelationshipResult::WriteFailed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::membership::{
        compute_signature, Capability, MemberRecord, RelationshipSchema,
    };
    use crate::ports::{MemberDirectory, MembershipWriter};
    use async_trait::async_trait;
    use secrecy::SecretString;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Clone, Copy)]
    enum Holding {
        Nothing,
        ViaPredicate,
        ViaIdList,
    }

    struct MockMember {
        id: MemberId,
        holding: Holding,
    }

    impl MemberRecord for MockMember {
        fn member_id(&self) -> MemberId {
            self.id
        }

        fn has_membership(&self, _plan_id: MembershipPlanId) -> Capability<bool> {
            match self.holding {
                Holding::ViaPredicate => Capability::Supported(true),
                _ => Capability::Unsupported,
            }
        }

        fn membership_ids(&self) -> Capability<Vec<MembershipPlanId>> {
            match self.holding {
                Holding::ViaIdList => Capability::Supported(vec![plan(7)]),
                Holding::Nothing => Capability::Supported(vec![]),
                Holding::ViaPredicate => Capability::Unsupported,
            }
        }
    }

    struct MockDirectory {
        holding: Option<Holding>,
        fail: bool,
    }

    impl MockDirectory {
        fn with_member(holding: Holding) -> Self {
            Self {
                holding: Some(holding),
                fail: false,
            }
        }

        fn empty() -> Self {
            Self {
                holding: None,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                holding: None,
                fail: true,
            }
        }
    }

    #[async_trait]
    impl MemberDirectory for MockDirectory {
        async fn find_member(
            &self,
            id: MemberId,
        ) -> Result<Option<Box<dyn MemberRecord>>, DomainError> {
            if self.fail {
                return Err(DomainError::database("connection refused"));
            }
            Ok(self
                .holding
                .map(|holding| Box::new(MockMember { id, holding }) as Box<dyn MemberRecord>))
        }
    }

    struct MockWriter {
        schema: RelationshipSchema,
        saved: Mutex<Vec<MembershipRelationship>>,
        fail: bool,
    }

    impl MockWriter {
        fn new() -> Self {
            Self {
                schema: RelationshipSchema::default(),
                saved: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn read_only() -> Self {
            Self {
                schema: RelationshipSchema {
                    can_save: false,
                    ..RelationshipSchema::default()
                },
                ..Self::new()
            }
        }

        fn saved(&self) -> Vec<MembershipRelationship> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MembershipWriter for MockWriter {
        fn schema(&self) -> RelationshipSchema {
            self.schema.clone()
        }

        async fn save(&self, relationship: &MembershipRelationship) -> Result<(), DomainError> {
            if self.fail {
                return Err(DomainError::database("insert failed"));
            }
            self.saved.lock().unwrap().push(relationship.clone());
            Ok(())
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════════

    const SECRET: &str = "whsec_test";

    fn plan(id: u64) -> MembershipPlanId {
        MembershipPlanId::new(id).unwrap()
    }

    fn checkout_payload(metadata: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_test_123",
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_test_456", "metadata": metadata } }
        }))
        .unwrap()
    }

    fn memberdash_payload() -> Vec<u8> {
        checkout_payload(json!({
            "is_memberdash": "true",
            "member_id": "42",
            "membership_id": "7"
        }))
    }

    fn command(payload: Vec<u8>) -> HandleCheckoutWebhookCommand {
        HandleCheckoutWebhookCommand {
            payload,
            signature: None,
        }
    }

    fn signed_command(payload: Vec<u8>) -> HandleCheckoutWebhookCommand {
        let timestamp = Timestamp::now().as_unix_secs().to_string();
        let signature = compute_signature(SECRET.as_bytes(), &timestamp, &payload).unwrap();
        HandleCheckoutWebhookCommand {
            payload,
            signature: Some(format!("t={},v1={}", timestamp, signature)),
        }
    }

    fn handler_with(
        directory: MockDirectory,
        writer: Arc<MockWriter>,
        verifier: Option<StripeWebhookVerifier>,
    ) -> HandleCheckoutWebhookHandler {
        let system = MembershipSystem::new(Arc::new(directory), writer);
        HandleCheckoutWebhookHandler::new(verifier, Some(system))
    }

    fn verifier() -> StripeWebhookVerifier {
        StripeWebhookVerifier::new(SecretString::new(SECRET.to_string()))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Pass-through
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn other_event_types_pass_through() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(MockDirectory::empty(), writer.clone(), Some(verifier()));
        let payload = serde_json::to_vec(&json!({
            "type": "payment_intent.succeeded",
            "data": { "object": { "metadata": {
                "is_memberdash": "true", "member_id": "42", "membership_id": "7"
            } } }
        }))
        .unwrap();

        let outcome = handler.handle(command(payload)).await;

        assert_eq!(outcome, WebhookOutcome::PassThrough);
        assert!(!outcome.is_handled());
        assert!(writer.saved().is_empty());
    }

    #[tokio::test]
    async fn empty_and_malformed_bodies_pass_through() {
        let handler = handler_with(MockDirectory::empty(), Arc::new(MockWriter::new()), None);

        let payloads: [&[u8]; 5] = [
            b"",
            b"not json",
            b"[1,2]",
            br#"{"data":{}}"#,
            br#"{"type":5}"#,
        ];
        for payload in payloads {
            let outcome = handler.handle(command(payload.to_vec())).await;
            assert_eq!(outcome, WebhookOutcome::PassThrough);
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Signature
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_signature_is_rejected_when_secret_configured() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(MockDirectory::empty(), writer.clone(), Some(verifier()));

        let outcome = handler.handle(command(memberdash_payload())).await;

        assert_eq!(outcome, WebhookOutcome::InvalidSignature);
        assert!(writer.saved().is_empty());
    }

    #[tokio::test]
    async fn tampered_payload_is_rejected() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(MockDirectory::empty(), writer.clone(), Some(verifier()));
        let mut cmd = signed_command(memberdash_payload());
        cmd.payload = checkout_payload(json!({
            "is_memberdash": "true",
            "member_id": "1",
            "membership_id": "7"
        }));

        let outcome = handler.handle(cmd).await;

        assert_eq!(outcome, WebhookOutcome::InvalidSignature);
        assert!(writer.saved().is_empty());
    }

    #[tokio::test]
    async fn valid_signature_is_accepted() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(MockDirectory::empty(), writer.clone(), Some(verifier()));

        let outcome = handler.handle(signed_command(memberdash_payload())).await;

        assert!(matches!(outcome, WebhookOutcome::Created { .. }));
        assert_eq!(writer.saved().len(), 1);
    }

    #[tokio::test]
    async fn signature_is_skipped_without_verifier() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(MockDirectory::empty(), writer.clone(), None);
        let mut cmd = command(memberdash_payload());
        cmd.signature = Some("t=1,v1=garbage".to_string());

        let outcome = handler.handle(cmd).await;

        assert!(matches!(outcome, WebhookOutcome::Created { .. }));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Metadata gates
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_provenance_flag_is_ignored() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(MockDirectory::empty(), writer.clone(), None);
        let payload = checkout_payload(json!({ "member_id": "42", "membership_id": "7" }));

        let outcome = handler.handle(command(payload)).await;

        assert_eq!(outcome, WebhookOutcome::NotMemberDashSession);
        assert!(writer.saved().is_empty());
    }

    #[tokio::test]
    async fn provenance_flag_must_be_exact_string() {
        let handler = handler_with(MockDirectory::empty(), Arc::new(MockWriter::new()), None);

        for flag in [json!(true), json!("1"), json!("TRUE")] {
            let payload = checkout_payload(json!({
                "is_memberdash": flag, "member_id": "42", "membership_id": "7"
            }));
            let outcome = handler.handle(command(payload)).await;
            assert_eq!(outcome, WebhookOutcome::NotMemberDashSession);
        }
    }

    #[tokio::test]
    async fn zero_or_missing_identifiers_are_ignored() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(MockDirectory::empty(), writer.clone(), None);

        for metadata in [
            json!({ "is_memberdash": "true", "membership_id": "7" }),
            json!({ "is_memberdash": "true", "member_id": "42" }),
            json!({ "is_memberdash": "true", "member_id": "0", "membership_id": "7" }),
            json!({ "is_memberdash": "true", "member_id": "abc", "membership_id": "7" }),
        ] {
            let outcome = handler.handle(command(checkout_payload(metadata))).await;
            assert_eq!(outcome, WebhookOutcome::MissingIdentifiers);
        }
        assert!(writer.saved().is_empty());
    }

    #[tokio::test]
    async fn unavailable_membership_system_is_ignored() {
        let handler = HandleCheckoutWebhookHandler::new(None, None);

        let outcome = handler.handle(command(memberdash_payload())).await;

        assert_eq!(outcome, WebhookOutcome::MembershipUnavailable);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Creation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creates_active_relationship_for_new_member() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(
            MockDirectory::with_member(Holding::Nothing),
            writer.clone(),
            None,
        );

        let outcome = handler.handle(command(memberdash_payload())).await;

        assert_eq!(
            outcome,
            WebhookOutcome::Created {
                member_id: MemberId::new(42).unwrap(),
                membership_id: plan(7),
            }
        );
        let saved = writer.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].member_id.as_u64(), 42);
        assert_eq!(saved[0].membership_id.as_u64(), 7);
        assert_eq!(saved[0].status.as_str(), "active");
        assert!(saved[0].started_at.is_some());
    }

    #[tokio::test]
    async fn creates_relationship_when_member_record_is_absent() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(MockDirectory::empty(), writer.clone(), None);

        let outcome = handler.handle(command(memberdash_payload())).await;

        assert!(matches!(outcome, WebhookOutcome::Created { .. }));
        assert_eq!(writer.saved().len(), 1);
    }

    #[tokio::test]
    async fn existing_membership_via_predicate_is_not_duplicated() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(
            MockDirectory::with_member(Holding::ViaPredicate),
            writer.clone(),
            None,
        );

        let outcome = handler.handle(command(memberdash_payload())).await;

        assert_eq!(outcome, WebhookOutcome::AlreadyMember);
        assert!(writer.saved().is_empty());
    }

    #[tokio::test]
    async fn existing_membership_via_id_list_is_not_duplicated() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(
            MockDirectory::with_member(Holding::ViaIdList),
            writer.clone(),
            None,
        );

        let outcome = handler.handle(command(memberdash_payload())).await;

        assert_eq!(outcome, WebhookOutcome::AlreadyMember);
        assert!(writer.saved().is_empty());
    }

    #[tokio::test]
    async fn write_failure_resolves_to_write_failed() {
        let handler = handler_with(
            MockDirectory::empty(),
            Arc::new(MockWriter::failing()),
            None,
        );

        let outcome = handler.handle(command(memberdash_payload())).await;

        assert_eq!(outcome, WebhookOutcome::WriteFailed);
        assert!(outcome.is_handled());
    }

    #[tokio::test]
    async fn lookup_failure_resolves_to_write_failed() {
        let writer = Arc::new(MockWriter::new());
        let handler = handler_with(MockDirectory::failing(), writer.clone(), None);

        let result = handler
            .create_relationship(MemberId::new(42).unwrap(), plan(7), Timestamp::now())
            .await;

        match result {
            CreateRelationshipResult::WriteFailed(e) => {
                assert_eq!(e.code, ErrorCode::DatabaseError)
            }
            other => panic!("expected WriteFailed, got {:?}", other),
        }
        assert!(writer.saved().is_empty());
    }

    #[tokio::test]
    async fn read_only_schema_reports_created_without_saving() {
        let writer = Arc::new(MockWriter::read_only());
        let handler = handler_with(MockDirectory::empty(), writer.clone(), None);

        let outcome = handler.handle(command(memberdash_payload())).await;

        assert!(matches!(outcome, WebhookOutcome::Created { .. }));
        assert!(writer.saved().is_empty());
    }
}
