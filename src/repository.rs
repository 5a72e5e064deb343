//! Durable storage and retrieval of approval records.

use crate::approval::{ApprovalRecord, ApprovalStatus, ReviewDecision};
use crate::store::RemoteStore;
use crate::utils::new_prefixed_id;
use chrono::Utc;
use std::sync::Arc;

/// Reads and writes approval records through the remote store. Every
/// operation is a network round trip; there is no local cache and no
/// optimistic concurrency, so the last write wins.
pub struct ApprovalRepository {
    store: Arc<dyn RemoteStore>,
}

impl ApprovalRepository {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    async fn load_all<T: ApprovalRecord>(&self) -> anyhow::Result<Vec<T>> {
        let values = self.store.list(T::COLLECTION).await?;
        values
            .into_iter()
            .map(|value| Ok(serde_json::from_value(value)?))
            .collect()
    }

    /// All records regardless of status, in store insertion order.
    pub async fn list_all<T: ApprovalRecord>(&self) -> anyhow::Result<Vec<T>> {
        self.load_all().await
    }

    /// Records still waiting for review.
    pub async fn list_pending<T: ApprovalRecord>(&self) -> anyhow::Result<Vec<T>> {
        let records = self.load_all::<T>().await?;
        Ok(records
            .into_iter()
            .filter(|record| record.status() == ApprovalStatus::Pending)
            .collect())
    }

    /// Records submitted by the given producer/client.
    pub async fn list_for_actor<T: ApprovalRecord>(&self, actor_id: &str) -> anyhow::Result<Vec<T>> {
        let records = self.load_all::<T>().await?;
        Ok(records
            .into_iter()
            .filter(|record| record.requested_by() == actor_id)
            .collect())
    }

    pub async fn get<T: ApprovalRecord>(&self, id: &str) -> anyhow::Result<T> {
        let value = self.store.get(T::COLLECTION, id).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Persist a new record: assigns the id and creation time and forces
    /// `pending`, whatever the caller passed in.
    pub async fn create<T: ApprovalRecord>(&self, mut record: T) -> anyhow::Result<T> {
        record.assign(new_prefixed_id("apv")?, Utc::now());
        let stored = self
            .store
            .create(T::COLLECTION, &serde_json::to_value(&record)?)
            .await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Record the admin's verdict. Refuses records that already left
    /// `pending`; the transition is one-way and happens at most once.
    pub async fn review<T: ApprovalRecord>(
        &self,
        id: &str,
        decision: ReviewDecision,
        reviewer_id: &str,
        comment: Option<String>,
    ) -> anyhow::Result<T> {
        let mut record: T = self.get(id).await?;
        if record.status() != ApprovalStatus::Pending {
            anyhow::bail!(
                "{} approval {} has already been reviewed ({:?})",
                T::KIND,
                id,
                record.status()
            );
        }

        record.apply_review(decision, reviewer_id, comment, Utc::now());
        let stored = self
            .store
            .put(T::COLLECTION, id, &serde_json::to_value(&record)?)
            .await?;
        tracing::info!(kind = T::KIND, approval_id = id, ?decision, "approval reviewed");
        Ok(serde_json::from_value(stored)?)
    }
}
