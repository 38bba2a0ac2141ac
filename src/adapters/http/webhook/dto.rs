//! HTTP DTOs for the checkout webhook responses.
//!
//! Every response the bridge sends has the same envelope:
//! `{"success": bool, "data": {"message": ..., ["user_id", "membership_id"]}}`.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::WebhookOutcome;

pub const INVALID_SIGNATURE: &str = "Invalid Stripe signature";
pub const NOT_MEMBERDASH_SESSION: &str = "Not a MemberDash session; ignored";
pub const MISSING_IDENTIFIERS: &str = "Missing member_id or membership_id; ignored";
pub const MEMBERSHIP_UNAVAILABLE: &str = "MemberDash classes not available; ignored";
pub const ALREADY_MEMBER: &str = "User already has membership; ignored";
pub const RELATIONSHIP_CREATED: &str = "Membership relationship created";
pub const WRITE_FAILED: &str = "Exception occurred; check debug.log";

/// Content type of every webhook response.
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response body for a handled webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub data: WebhookResponseData,
}

/// The `data` object of a webhook response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookResponseData {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_id: Option<u64>,
}

impl WebhookResponse {
    fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            data: WebhookResponseData {
                message,
                user_id: None,
                membership_id: None,
            },
        }
    }

    /// Maps an outcome to its fixed status and body.
    ///
    /// Returns `None` for pass-through, which the host answers instead.
    pub fn from_outcome(outcome: &WebhookOutcome) -> Option<(StatusCode, Self)> {
        let response = match outcome {
            WebhookOutcome::PassThrough => return None,
            WebhookOutcome::InvalidSignature => {
                return Some((
                    StatusCode::BAD_REQUEST,
                    Self {
                        success: false,
                        ..Self::ok(INVALID_SIGNATURE)
                    },
                ))
            }
            WebhookOutcome::NotMemberDashSession => Self::ok(NOT_MEMBERDASH_SESSION),
            WebhookOutcome::MissingIdentifiers => Self::ok(MISSING_IDENTIFIERS),
            WebhookOutcome::MembershipUnavailable => Self::ok(MEMBERSHIP_UNAVAILABLE),
            WebhookOutcome::AlreadyMember => Self::ok(ALREADY_MEMBER),
            WebhookOutcome::Created {
                member_id,
                membership_id,
            } => Self {
                success: true,
                data: WebhookResponseData {
                    message: RELATIONSHIP_CREATED,
                    user_id: Some(member_id.as_u64()),
                    membership_id: Some(membership_id.as_u64()),
                },
            },
            WebhookOutcome::WriteFailed => Self::ok(WRITE_FAILED),
        };

        Some((StatusCode::OK, response))
    }
}

/// A status plus body, rendered with the UTF-8 JSON content type.
pub struct WebhookReply(pub StatusCode, pub WebhookResponse);

impl IntoResponse for WebhookReply {
    fn into_response(self) -> Response {
        let body = match serde_json::to_vec(&self.1) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize webhook response");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        (
            self.0,
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{MemberId, MembershipPlanId};
    use serde_json::json;

    fn body(outcome: WebhookOutcome) -> (StatusCode, serde_json::Value) {
        let (status, response) = WebhookResponse::from_outcome(&outcome).unwrap();
        (status, serde_json::to_value(response).unwrap())
    }

    #[test]
    fn pass_through_has_no_response() {
        assert!(WebhookResponse::from_outcome(&WebhookOutcome::PassThrough).is_none());
    }

    #[test]
    fn invalid_signature_is_bad_request() {
        let (status, json) = body(WebhookOutcome::InvalidSignature);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            json!({ "success": false, "data": { "message": "Invalid Stripe signature" } })
        );
    }

    #[test]
    fn ignored_outcomes_are_ok_with_message_only() {
        let cases = [
            (WebhookOutcome::NotMemberDashSession, NOT_MEMBERDASH_SESSION),
            (WebhookOutcome::MissingIdentifiers, MISSING_IDENTIFIERS),
            (WebhookOutcome::MembershipUnavailable, MEMBERSHIP_UNAVAILABLE),
            (WebhookOutcome::AlreadyMember, ALREADY_MEMBER),
            (WebhookOutcome::WriteFailed, WRITE_FAILED),
        ];

        for (outcome, message) in cases {
            let (status, json) = body(outcome);
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json, json!({ "success": true, "data": { "message": message } }));
        }
    }

    #[test]
    fn created_includes_identifiers() {
        let (status, json) = body(WebhookOutcome::Created {
            member_id: MemberId::new(42).unwrap(),
            membership_id: MembershipPlanId::new(7).unwrap(),
        });

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "success": true,
                "data": {
                    "message": "Membership relationship created",
                    "user_id": 42,
                    "membership_id": 7
                }
            })
        );
    }

    #[test]
    fn reply_sets_utf8_json_content_type() {
        let (status, response) =
            WebhookResponse::from_outcome(&WebhookOutcome::AlreadyMember).unwrap();
        let reply = WebhookReply(status, response).into_response();

        assert_eq!(reply.status(), StatusCode::OK);
        assert_eq!(reply.headers()[header::CONTENT_TYPE], JSON_UTF8);
    }
}
