//! Service layer API for the approval workflow.
//!
//! Producers and clients submit actions here; anything from a
//! non-admin is queued as a pending approval record and mutates
//! nothing until an administrator approves it. Admin submissions skip
//! the queue and hit the live collections directly.

use crate::approval::{
    OrderAction, OrderApproval, ProductAction, ProductApproval, ReviewDecision,
};
use crate::auth::{self, Session};
use crate::catalog::{CatalogMutator, Product, ProductDraft, ProductPatch};
use crate::error::AuthError;
use crate::orders::{Order, OrderCancellation, OrderDraft, OrderMutator};
use crate::repository::ApprovalRepository;
use crate::store::RemoteStore;
use crate::utils::new_prefixed_id;
use std::sync::Arc;

/// Outcome of a product submission.
#[derive(Debug)]
pub enum ProductSubmission {
    /// Applied immediately (admin bypass). `None` for delete actions.
    Applied(Option<Product>),
    /// Queued for review; nothing was mutated.
    Queued(ProductApproval),
}

/// Outcome of an order submission.
#[derive(Debug)]
pub enum OrderSubmission {
    /// Applied immediately (admin bypass).
    Applied(Order),
    /// Queued for review; nothing was mutated.
    Queued(OrderApproval),
}

pub struct ApprovalService {
    repository: ApprovalRepository,
    catalog: CatalogMutator,
    orders: OrderMutator,
}

impl ApprovalService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            repository: ApprovalRepository::new(store.clone()),
            catalog: CatalogMutator::new(store.clone()),
            orders: OrderMutator::new(store),
        }
    }

    pub fn repository(&self) -> &ApprovalRepository {
        &self.repository
    }

    pub fn catalog(&self) -> &CatalogMutator {
        &self.catalog
    }

    pub fn orders(&self) -> &OrderMutator {
        &self.orders
    }

    /// Submit a new product for the catalog.
    pub async fn create_product(
        &self,
        session: &Session,
        draft: ProductDraft,
    ) -> anyhow::Result<ProductSubmission> {
        self.submit_product_action(session, None, ProductAction::Create(draft))
            .await
    }

    /// Submit a partial update against an existing product.
    pub async fn update_product(
        &self,
        session: &Session,
        product_id: &str,
        patch: ProductPatch,
    ) -> anyhow::Result<ProductSubmission> {
        self.submit_product_action(session, Some(product_id), ProductAction::Update(patch))
            .await
    }

    /// Submit removal of an existing product.
    pub async fn delete_product(
        &self,
        session: &Session,
        product_id: &str,
    ) -> anyhow::Result<ProductSubmission> {
        self.submit_product_action(session, Some(product_id), ProductAction::Delete)
            .await
    }

    /// Submit a new order.
    pub async fn place_order(
        &self,
        session: &Session,
        draft: OrderDraft,
    ) -> anyhow::Result<OrderSubmission> {
        self.submit_order_action(session, None, OrderAction::Create(draft))
            .await
    }

    /// Submit cancellation of an existing order.
    pub async fn cancel_order(
        &self,
        session: &Session,
        order_id: &str,
        cancellation: OrderCancellation,
    ) -> anyhow::Result<OrderSubmission> {
        self.submit_order_action(session, Some(order_id), OrderAction::Cancel(cancellation))
            .await
    }

    async fn submit_product_action(
        &self,
        session: &Session,
        target: Option<&str>,
        action: ProductAction,
    ) -> anyhow::Result<ProductSubmission> {
        if !session.role.can_submit_product_actions() {
            return Err(AuthError::ProductActionsForbidden(session.role).into());
        }
        action.validate()?;

        // Admins are trusted; producers are not.
        if session.role.bypasses_approval() {
            let product = self
                .apply_product_action(&action, target, &session.user_id, &session.name)
                .await?;
            return Ok(ProductSubmission::Applied(product));
        }

        // The target id for a create is a placeholder until execution
        // assigns the live one.
        let product_id = match target {
            Some(id) => id.to_string(),
            None => new_prefixed_id("tmp")?,
        };
        let record = ProductApproval::new(product_id, action, &session.user_id, &session.name);
        let record = self.repository.create(record).await?;
        tracing::info!(approval_id = %record.id, producer_id = %record.producer_id, "product action queued for review");
        Ok(ProductSubmission::Queued(record))
    }

    async fn submit_order_action(
        &self,
        session: &Session,
        target: Option<&str>,
        action: OrderAction,
    ) -> anyhow::Result<OrderSubmission> {
        if !session.role.can_submit_order_actions() {
            return Err(AuthError::OrderActionsForbidden(session.role).into());
        }
        action.validate()?;

        if session.role.bypasses_approval() {
            let order = self
                .apply_order_action(&action, target, &session.user_id, &session.name)
                .await?;
            return Ok(OrderSubmission::Applied(order));
        }

        let order_id = match target {
            Some(id) => id.to_string(),
            None => new_prefixed_id("tmp")?,
        };
        let record = OrderApproval::new(order_id, action, &session.user_id, &session.name);
        let record = self.repository.create(record).await?;
        tracing::info!(approval_id = %record.id, client_id = %record.client_id, "order action queued for review");
        Ok(OrderSubmission::Queued(record))
    }

    /// Review a pending product approval.
    ///
    /// On approval the proposed mutation is executed against the live
    /// catalog. A mutator failure after the review was persisted leaves
    /// the ledger approved with no matching catalog write; that
    /// divergence is logged and the error propagated.
    pub async fn decide_product(
        &self,
        session: &Session,
        approval_id: &str,
        decision: ReviewDecision,
        comment: Option<String>,
    ) -> anyhow::Result<ProductApproval> {
        auth::ensure_reviewer(session)?;
        let record: ProductApproval = self
            .repository
            .review(approval_id, decision, &session.user_id, comment)
            .await?;

        if decision == ReviewDecision::Approved {
            if let Err(err) = self
                .apply_product_action(
                    &record.action,
                    Some(&record.product_id),
                    &record.producer_id,
                    &record.producer_name,
                )
                .await
            {
                tracing::error!(
                    approval_id = %record.id,
                    error = %err,
                    "approved product action failed to execute; ledger and catalog diverge"
                );
                return Err(err);
            }
        }
        Ok(record)
    }

    /// Review a pending order approval. See [`Self::decide_product`].
    pub async fn decide_order(
        &self,
        session: &Session,
        approval_id: &str,
        decision: ReviewDecision,
        comment: Option<String>,
    ) -> anyhow::Result<OrderApproval> {
        auth::ensure_reviewer(session)?;
        let record: OrderApproval = self
            .repository
            .review(approval_id, decision, &session.user_id, comment)
            .await?;

        if decision == ReviewDecision::Approved {
            if let Err(err) = self
                .apply_order_action(
                    &record.action,
                    Some(&record.order_id),
                    &record.client_id,
                    &record.client_name,
                )
                .await
            {
                tracing::error!(
                    approval_id = %record.id,
                    error = %err,
                    "approved order action failed to execute; ledger and order store diverge"
                );
                return Err(err);
            }
        }
        Ok(record)
    }

    /// Pending product approvals awaiting review.
    pub async fn pending_product_approvals(&self) -> anyhow::Result<Vec<ProductApproval>> {
        self.repository.list_pending().await
    }

    /// Pending order approvals awaiting review.
    pub async fn pending_order_approvals(&self) -> anyhow::Result<Vec<OrderApproval>> {
        self.repository.list_pending().await
    }

    /// Every product approval submitted by the given producer.
    pub async fn product_approvals_for(
        &self,
        producer_id: &str,
    ) -> anyhow::Result<Vec<ProductApproval>> {
        self.repository.list_for_actor(producer_id).await
    }

    /// Every order approval submitted by the given client.
    pub async fn order_approvals_for(&self, client_id: &str) -> anyhow::Result<Vec<OrderApproval>> {
        self.repository.list_for_actor(client_id).await
    }

    // Dispatch table for product actions. Used both for the admin
    // bypass and for execution after approval.
    async fn apply_product_action(
        &self,
        action: &ProductAction,
        target: Option<&str>,
        producer_id: &str,
        producer_name: &str,
    ) -> anyhow::Result<Option<Product>> {
        match action {
            ProductAction::Create(draft) => {
                let product = self
                    .catalog
                    .create_product(draft, producer_id, producer_name)
                    .await?;
                Ok(Some(product))
            }
            ProductAction::Update(patch) => {
                let id = target
                    .ok_or_else(|| anyhow::anyhow!("product update without a target id"))?;
                let product = self.catalog.update_product(id, patch).await?;
                Ok(Some(product))
            }
            ProductAction::Delete => {
                let id = target
                    .ok_or_else(|| anyhow::anyhow!("product delete without a target id"))?;
                self.catalog.delete_product(id).await?;
                Ok(None)
            }
        }
    }

    async fn apply_order_action(
        &self,
        action: &OrderAction,
        target: Option<&str>,
        client_id: &str,
        client_name: &str,
    ) -> anyhow::Result<Order> {
        match action {
            OrderAction::Create(draft) => {
                self.orders.create_order(draft, client_id, client_name).await
            }
            OrderAction::Cancel(cancellation) => {
                let id = target
                    .ok_or_else(|| anyhow::anyhow!("order cancel without a target id"))?;
                self.orders
                    .cancel_order(id, &cancellation.cancellation_reason)
                    .await
            }
        }
    }
}
