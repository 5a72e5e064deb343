//! Live order records and the mutator that writes them.

use crate::error::ValidationError;
use crate::store::{RemoteStore, collections};
use crate::utils::new_prefixed_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// An order starts its own lifecycle as soon as it is created.
    Processing,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub title: String,
    /// Unit price in minor currency units at the time of ordering.
    pub price: u64,
    pub quantity: u32,
}

/// An order as seen by end users, distinct from the approval ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub items: Vec<OrderItem>,
    pub total: u64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Full payload for a proposed order creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
}

/// Payload for a proposed order cancellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCancellation {
    pub cancellation_reason: String,
}

impl OrderDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::EmptyOrder);
        }
        if self.items.iter().any(|item| item.quantity == 0) {
            return Err(ValidationError::ZeroQuantity);
        }
        self.total()?;
        Ok(())
    }

    /// Order total as the sum over the items. Fails rather than wrap
    /// when a line or the sum does not fit in a `u64`.
    pub fn total(&self) -> Result<u64, ValidationError> {
        self.items.iter().try_fold(0u64, |acc, item| {
            item.price
                .checked_mul(u64::from(item.quantity))
                .and_then(|line| acc.checked_add(line))
                .ok_or(ValidationError::TotalOverflow)
        })
    }
}

impl OrderCancellation {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cancellation_reason.trim().is_empty() {
            return Err(ValidationError::EmptyCancellationReason);
        }
        Ok(())
    }
}

/// Thin executor for order writes against the live collection.
pub struct OrderMutator {
    store: Arc<dyn RemoteStore>,
}

impl OrderMutator {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Insert a new order with a freshly assigned live id.
    pub async fn create_order(
        &self,
        draft: &OrderDraft,
        client_id: &str,
        client_name: &str,
    ) -> anyhow::Result<Order> {
        let order = Order {
            id: new_prefixed_id("ord")?,
            client_id: client_id.to_string(),
            client_name: client_name.to_string(),
            items: draft.items.clone(),
            total: draft.total()?,
            status: OrderStatus::Processing,
            created_at: Utc::now(),
            cancellation_reason: None,
            cancelled_at: None,
        };
        let stored = self
            .store
            .create(collections::ORDERS, &serde_json::to_value(&order)?)
            .await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Mark an existing order cancelled, recording the reason and time.
    pub async fn cancel_order(&self, id: &str, reason: &str) -> anyhow::Result<Order> {
        let changes = serde_json::json!({
            "status": OrderStatus::Cancelled,
            "cancellationReason": reason,
            "cancelledAt": Utc::now(),
        });
        let stored = self.store.patch(collections::ORDERS, id, &changes).await?;
        Ok(serde_json::from_value(stored)?)
    }

    pub async fn get_order(&self, id: &str) -> anyhow::Result<Order> {
        let value = self.store.get(collections::ORDERS, id).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        let values = self.store.list(collections::ORDERS).await?;
        values
            .into_iter()
            .map(|value| Ok(serde_json::from_value(value)?))
            .collect()
    }
}
