//! Smoke screen unit tests for approval workflow components
//!
//! These are unit tests that span the codebase, testing behavior in
//! isolation from integration scenarios. They are intended as a
//! smoke-screen and generally test the happy path plus the obvious
//! rejections.

use agro_approval::{
    approval::{
        ApprovalRecord, ApprovalStatus, OrderAction, ProductAction, ProductApproval,
        ReviewDecision,
    },
    auth::{Role, Session, ensure_reviewer},
    catalog::{ProductDraft, ProductPatch},
    orders::OrderCancellation,
    utils::new_prefixed_id,
};
use chrono::Utc;

// UTILS MODULE TESTS
mod utils_tests {
    use super::*;

    /// Generated ids carry the requested human-readable prefix.
    #[test]
    fn generates_ids_with_prefix() {
        let id = new_prefixed_id("apv").unwrap();
        assert!(id.starts_with("apv1"));
        assert!(id.len() > 10);
    }

    /// Multiple calls generate unique identifiers.
    #[test]
    fn generates_unique_ids() {
        let id1 = new_prefixed_id("apv").unwrap();
        let id2 = new_prefixed_id("apv").unwrap();
        let id3 = new_prefixed_id("apv").unwrap();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    /// An empty prefix is not a valid bech32 hrp.
    #[test]
    fn rejects_empty_prefix() {
        assert!(new_prefixed_id("").is_err());
    }
}

// AUTH MODULE TESTS
mod auth_tests {
    use super::*;

    #[test]
    fn only_admins_bypass_and_review() {
        assert!(Role::Admin.bypasses_approval());
        assert!(Role::Admin.can_review());

        for role in [Role::Producer, Role::Client] {
            assert!(!role.bypasses_approval());
            assert!(!role.can_review());
        }
    }

    #[test]
    fn submission_capabilities_split_by_role() {
        assert!(Role::Producer.can_submit_product_actions());
        assert!(!Role::Producer.can_submit_order_actions());

        assert!(Role::Client.can_submit_order_actions());
        assert!(!Role::Client.can_submit_product_actions());

        assert!(Role::Admin.can_submit_product_actions());
        assert!(Role::Admin.can_submit_order_actions());
    }

    #[test]
    fn ensure_reviewer_rejects_non_admins() {
        let session = Session {
            user_id: "usr_1".to_string(),
            name: "Pat".to_string(),
            role: Role::Producer,
        };
        assert!(ensure_reviewer(&session).is_err());
    }

    /// Roles travel as lowercase strings on the wire.
    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
        assert_eq!(serde_json::to_value(Role::Producer).unwrap(), "producer");
        assert_eq!(serde_json::to_value(Role::Client).unwrap(), "client");
    }
}

// APPROVAL RECORD TESTS
mod record_tests {
    use super::*;

    fn pending_record() -> ProductApproval {
        ProductApproval::new(
            "prd_1".to_string(),
            ProductAction::Update(ProductPatch {
                price: Some(600),
                ..ProductPatch::default()
            }),
            "usr_producer",
            "Pat Producer",
        )
    }

    /// New records are pending with no review fields.
    #[test]
    fn new_records_are_pending() {
        let record = pending_record();
        assert_eq!(record.status, ApprovalStatus::Pending);
        assert!(record.reviewed_at.is_none());
        assert!(record.reviewed_by.is_none());
        assert!(record.review_comment.is_none());
    }

    /// assign() stamps identity and resets everything review-related,
    /// whatever state the caller handed in.
    #[test]
    fn assign_forces_pending_and_clears_review_fields() {
        let mut record = pending_record();
        record.status = ApprovalStatus::Approved;
        record.reviewed_by = Some("usr_admin".to_string());
        record.reviewed_at = Some(Utc::now());

        record.assign("apv_fresh".to_string(), Utc::now());

        assert_eq!(record.id, "apv_fresh");
        assert_eq!(record.status, ApprovalStatus::Pending);
        assert!(record.reviewed_at.is_none());
        assert!(record.reviewed_by.is_none());
    }

    /// apply_review() records the verdict and the reviewer.
    #[test]
    fn apply_review_sets_all_review_fields() {
        let mut record = pending_record();
        record.apply_review(
            ReviewDecision::Rejected,
            "usr_admin",
            Some("no".to_string()),
            Utc::now(),
        );

        assert_eq!(record.status, ApprovalStatus::Rejected);
        assert_eq!(record.reviewed_by.as_deref(), Some("usr_admin"));
        assert_eq!(record.review_comment.as_deref(), Some("no"));
        assert!(record.reviewed_at.is_some());
    }

    /// Record JSON uses the store's camelCase field names.
    #[test]
    fn record_serializes_with_wire_field_names() {
        let value = serde_json::to_value(pending_record()).unwrap();

        assert!(value.get("productId").is_some());
        assert!(value.get("producerId").is_some());
        assert!(value.get("producerName").is_some());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["action"], "update");
        assert_eq!(value["productData"]["price"], 600);
    }
}

// ACTION VALIDATION TESTS
mod validation_tests {
    use super::*;

    #[test]
    fn create_requires_a_valid_draft() {
        let action = ProductAction::Create(ProductDraft {
            title: String::new(),
            description: None,
            price: 500,
            category: None,
        });
        assert!(action.validate().is_err());
    }

    #[test]
    fn update_requires_changed_fields() {
        let action = ProductAction::Update(ProductPatch::default());
        assert!(action.validate().is_err());
    }

    #[test]
    fn delete_carries_nothing_and_validates() {
        assert!(ProductAction::Delete.validate().is_ok());
    }

    #[test]
    fn cancel_requires_a_reason() {
        let action = OrderAction::Cancel(OrderCancellation {
            cancellation_reason: "   ".to_string(),
        });
        assert!(action.validate().is_err());
    }
}
