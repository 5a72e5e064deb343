//! Approval records: proposed mutations queued for admin review.
//!
//! A record is created `pending`, reviewed exactly once (`approved` or
//! `rejected`, never back), and kept forever as an audit trail. The
//! proposed payload travels as a tagged action variant, so a `delete`
//! can never carry product data and a `create` can never lack it.

use crate::catalog::{ProductDraft, ProductPatch};
use crate::error::ValidationError;
use crate::orders::{OrderCancellation, OrderDraft};
use crate::store::collections;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// The admin's verdict on a pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl From<ReviewDecision> for ApprovalStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => ApprovalStatus::Approved,
            ReviewDecision::Rejected => ApprovalStatus::Rejected,
        }
    }
}

/// A proposed product mutation. Serialized adjacently as the wire pair
/// `action` / `productData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "productData", rename_all = "lowercase")]
pub enum ProductAction {
    Create(ProductDraft),
    Update(ProductPatch),
    Delete,
}

/// A proposed order mutation. Serialized adjacently as the wire pair
/// `action` / `orderData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "orderData", rename_all = "lowercase")]
pub enum OrderAction {
    Create(OrderDraft),
    Cancel(OrderCancellation),
}

impl ProductAction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            ProductAction::Create(draft) => draft.validate(),
            ProductAction::Update(patch) => patch.validate(),
            ProductAction::Delete => Ok(()),
        }
    }
}

impl OrderAction {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            OrderAction::Create(draft) => draft.validate(),
            OrderAction::Cancel(cancellation) => cancellation.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductApproval {
    pub id: String,
    /// Target product; a placeholder until a `create` is executed.
    pub product_id: String,
    #[serde(flatten)]
    pub action: ProductAction,
    pub producer_id: String,
    pub producer_name: String,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderApproval {
    pub id: String,
    pub order_id: String,
    #[serde(flatten)]
    pub action: OrderAction,
    pub client_id: String,
    pub client_name: String,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comment: Option<String>,
}

impl ProductApproval {
    /// Fresh pending record. The repository assigns the real id and
    /// creation time on persist.
    pub fn new(product_id: String, action: ProductAction, producer_id: &str, producer_name: &str) -> Self {
        Self {
            id: String::new(),
            product_id,
            action,
            producer_id: producer_id.to_string(),
            producer_name: producer_name.to_string(),
            status: ApprovalStatus::Pending,
            created_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
            review_comment: None,
        }
    }
}

impl OrderApproval {
    /// Fresh pending record. The repository assigns the real id and
    /// creation time on persist.
    pub fn new(order_id: String, action: OrderAction, client_id: &str, client_name: &str) -> Self {
        Self {
            id: String::new(),
            order_id,
            action,
            client_id: client_id.to_string(),
            client_name: client_name.to_string(),
            status: ApprovalStatus::Pending,
            created_at: Utc::now(),
            reviewed_at: None,
            reviewed_by: None,
            review_comment: None,
        }
    }
}

/// What the repository needs from either approval kind.
pub trait ApprovalRecord: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Store collection the records live in.
    const COLLECTION: &'static str;
    /// Kind label for log lines.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn status(&self) -> ApprovalStatus;
    /// Identity of the requester (`producerId` / `clientId`).
    fn requested_by(&self) -> &str;

    /// Stamp identity and creation time, force `pending`, clear any
    /// review fields.
    fn assign(&mut self, id: String, created_at: DateTime<Utc>);

    /// Record the one-time review verdict.
    fn apply_review(
        &mut self,
        decision: ReviewDecision,
        reviewer_id: &str,
        comment: Option<String>,
        reviewed_at: DateTime<Utc>,
    );
}

macro_rules! impl_approval_record {
    ($record:ty, $collection:expr, $kind:expr, $actor:ident) => {
        impl ApprovalRecord for $record {
            const COLLECTION: &'static str = $collection;
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn status(&self) -> ApprovalStatus {
                self.status
            }

            fn requested_by(&self) -> &str {
                &self.$actor
            }

            fn assign(&mut self, id: String, created_at: DateTime<Utc>) {
                self.id = id;
                self.created_at = created_at;
                self.status = ApprovalStatus::Pending;
                self.reviewed_at = None;
                self.reviewed_by = None;
                self.review_comment = None;
            }

            fn apply_review(
                &mut self,
                decision: ReviewDecision,
                reviewer_id: &str,
                comment: Option<String>,
                reviewed_at: DateTime<Utc>,
            ) {
                self.status = decision.into();
                self.reviewed_at = Some(reviewed_at);
                self.reviewed_by = Some(reviewer_id.to_string());
                self.review_comment = comment;
            }
        }
    };
}

impl_approval_record!(
    ProductApproval,
    collections::PRODUCT_APPROVALS,
    "product",
    producer_id
);
impl_approval_record!(OrderApproval, collections::ORDER_APPROVALS, "order", client_id);
