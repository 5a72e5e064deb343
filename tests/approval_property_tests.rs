//! Property-based tests for the approval record state machine
//!
//! These tests use proptest to verify the invariants that must hold for
//! any approval record regardless of the specific action payload or the
//! order of review attempts. The status transition logic is the core of
//! the workflow - bugs here corrupt the approval ledger.
//!
//! Covered properties:
//!
//! 1. The first verdict wins - later review attempts fail and change nothing
//! 2. assign() always yields a clean pending record, whatever it is given
//! 3. Wire shape - only create/update carry productData, delete never does
//! 4. Rejection never mutates the live catalog
//! 5. Admin submissions never leave a record in the approval queue
//!
//! Not covered here (deliberately):
//!
//! - HTTP transport errors (exercised against the in-memory store only)
//! - Authorization checks (plain unit tests cover the role matrix)

use agro_approval::{
    approval::{ApprovalRecord, ApprovalStatus, ProductAction, ProductApproval, ReviewDecision},
    auth::{Role, Session},
    catalog::{ProductDraft, ProductPatch},
    memory::MemoryStore,
    service::{ApprovalService, ProductSubmission},
    store::{RemoteStore, collections},
};
use chrono::Utc;
use proptest::prelude::*;
use std::sync::Arc;

fn decision_strategy() -> impl Strategy<Value = ReviewDecision> {
    prop_oneof![
        Just(ReviewDecision::Approved),
        Just(ReviewDecision::Rejected),
    ]
}

/// Strategy for a draft that passes validation.
fn draft_strategy() -> impl Strategy<Value = ProductDraft> {
    (any::<u32>(), 1..100_000u64).prop_map(|(title, price)| ProductDraft {
        title: format!("produce_{}", title),
        description: None,
        price,
        category: None,
    })
}

fn patch_strategy() -> impl Strategy<Value = ProductPatch> {
    (1..100_000u64).prop_map(|price| ProductPatch {
        price: Some(price),
        ..ProductPatch::default()
    })
}

/// Strategy for any valid product action.
fn action_strategy() -> impl Strategy<Value = ProductAction> {
    prop_oneof![
        draft_strategy().prop_map(ProductAction::Create),
        patch_strategy().prop_map(ProductAction::Update),
        Just(ProductAction::Delete),
    ]
}

fn status_strategy() -> impl Strategy<Value = ApprovalStatus> {
    prop_oneof![
        Just(ApprovalStatus::Pending),
        Just(ApprovalStatus::Approved),
        Just(ApprovalStatus::Rejected),
    ]
}

fn producer() -> Session {
    Session {
        user_id: "usr_producer".to_string(),
        name: "Pat Producer".to_string(),
        role: Role::Producer,
    }
}

fn admin() -> Session {
    Session {
        user_id: "usr_admin".to_string(),
        name: "Alice Admin".to_string(),
        role: Role::Admin,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: across any sequence of review attempts, only the first
    /// verdict is recorded; every later attempt errors and the record
    /// never returns to pending.
    #[test]
    fn first_verdict_wins(
        action in action_strategy(),
        decisions in prop::collection::vec(decision_strategy(), 1..5),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = Arc::new(MemoryStore::new());
            let service = ApprovalService::new(store.clone());

            // seed a live product so update/delete have a target
            let ProductSubmission::Applied(Some(product)) = service
                .create_product(&admin(), ProductDraft {
                    title: "Tomatoes".to_string(),
                    description: None,
                    price: 500,
                    category: None,
                })
                .await
                .unwrap()
            else {
                panic!("admin create must apply immediately");
            };

            let submission = match &action {
                ProductAction::Create(draft) => {
                    service.create_product(&producer(), draft.clone()).await
                }
                ProductAction::Update(patch) => {
                    service
                        .update_product(&producer(), &product.id, patch.clone())
                        .await
                }
                ProductAction::Delete => service.delete_product(&producer(), &product.id).await,
            };
            let ProductSubmission::Queued(record) = submission.unwrap() else {
                panic!("producer submission must be queued");
            };

            let first = decisions[0];
            for (i, decision) in decisions.iter().enumerate() {
                let outcome = service
                    .decide_product(&admin(), &record.id, *decision, None)
                    .await;
                if i == 0 {
                    outcome.unwrap();
                } else {
                    assert!(outcome.is_err(), "a reviewed record must refuse further reviews");
                }
            }

            let stored: ProductApproval = service.repository().get(&record.id).await.unwrap();
            assert_eq!(stored.status, ApprovalStatus::from(first));
            assert_eq!(stored.reviewed_by.as_deref(), Some("usr_admin"));
            assert!(stored.reviewed_at.is_some());
        });
    }

    /// Property: assign() produces a pending record with cleared review
    /// fields no matter what state the input record carries.
    #[test]
    fn assign_always_yields_clean_pending(
        action in action_strategy(),
        status in status_strategy(),
        reviewed in any::<bool>(),
    ) {
        let mut record = ProductApproval::new(
            "prd_target".to_string(),
            action,
            "usr_producer",
            "Pat Producer",
        );
        record.status = status;
        if reviewed {
            record.reviewed_at = Some(Utc::now());
            record.reviewed_by = Some("usr_admin".to_string());
            record.review_comment = Some("stale".to_string());
        }

        record.assign("apv_fresh".to_string(), Utc::now());

        prop_assert_eq!(record.id.as_str(), "apv_fresh");
        prop_assert_eq!(record.status, ApprovalStatus::Pending);
        prop_assert!(record.reviewed_at.is_none());
        prop_assert!(record.reviewed_by.is_none());
        prop_assert!(record.review_comment.is_none());
    }

    /// Property: the wire pairing of action and payload is exact -
    /// delete never carries productData, create/update always do, and
    /// every action survives its own wire shape.
    #[test]
    fn action_wire_shape_is_exact(action in action_strategy()) {
        let value = serde_json::to_value(&action).unwrap();

        match &action {
            ProductAction::Delete => prop_assert!(value.get("productData").is_none()),
            _ => prop_assert!(value.get("productData").is_some()),
        }
        prop_assert!(value.get("action").is_some());

        let decoded: ProductAction = serde_json::from_value(value).unwrap();
        prop_assert_eq!(decoded, action);
    }

    /// Property: a rejected submission never reaches the live catalog.
    #[test]
    fn rejection_never_mutates_the_catalog(draft in draft_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = Arc::new(MemoryStore::new());
            let service = ApprovalService::new(store.clone());

            let ProductSubmission::Queued(record) = service
                .create_product(&producer(), draft)
                .await
                .unwrap()
            else {
                panic!("producer submission must be queued");
            };

            service
                .decide_product(&admin(), &record.id, ReviewDecision::Rejected, None)
                .await
                .unwrap();

            assert!(store.list(collections::PRODUCTS).await.unwrap().is_empty());
        });
    }

    /// Property: admin submissions apply immediately and never enqueue.
    #[test]
    fn admin_submissions_never_enqueue(draft in draft_strategy()) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let store = Arc::new(MemoryStore::new());
            let service = ApprovalService::new(store.clone());

            let submission = service.create_product(&admin(), draft).await.unwrap();
            assert!(matches!(submission, ProductSubmission::Applied(Some(_))));
            assert!(
                store
                    .list(collections::PRODUCT_APPROVALS)
                    .await
                    .unwrap()
                    .is_empty()
            );
        });
    }
}
