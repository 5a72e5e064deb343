//! Live product catalog records and the mutator that writes them.

use crate::error::ValidationError;
use crate::store::{RemoteStore, collections};
use crate::utils::new_prefixed_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Visible to buyers. Every product written through the workflow
    /// lands in this state.
    Approved,
    /// Kept in the catalog but not purchasable (out of season, sold out).
    Unavailable,
}

/// A product as seen by end users, distinct from the approval ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price in minor currency units.
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub producer_id: String,
    pub producer_name: String,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}

/// Full payload for a proposed product creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Partial payload for a proposed product update. Unset fields are left
/// untouched by the merge-write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.price == 0 {
            return Err(ValidationError::ZeroPrice);
        }
        Ok(())
    }
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle);
            }
        }
        if self.price == Some(0) {
            return Err(ValidationError::ZeroPrice);
        }
        Ok(())
    }
}

/// Thin executor for product writes against the live collection.
///
/// Performs the keyed CRUD calls and nothing else; all decision logic
/// stays in the workflow engine.
pub struct CatalogMutator {
    store: Arc<dyn RemoteStore>,
}

impl CatalogMutator {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Insert a new product with a freshly assigned live id.
    pub async fn create_product(
        &self,
        draft: &ProductDraft,
        producer_id: &str,
        producer_name: &str,
    ) -> anyhow::Result<Product> {
        let product = Product {
            id: new_prefixed_id("prd")?,
            title: draft.title.clone(),
            description: draft.description.clone(),
            price: draft.price,
            category: draft.category.clone(),
            producer_id: producer_id.to_string(),
            producer_name: producer_name.to_string(),
            status: ProductStatus::Approved,
            created_at: Utc::now(),
        };
        let stored = self
            .store
            .create(collections::PRODUCTS, &serde_json::to_value(&product)?)
            .await?;
        Ok(serde_json::from_value(stored)?)
    }

    /// Partial merge-write against an existing product.
    pub async fn update_product(&self, id: &str, patch: &ProductPatch) -> anyhow::Result<Product> {
        let stored = self
            .store
            .patch(collections::PRODUCTS, id, &serde_json::to_value(patch)?)
            .await?;
        Ok(serde_json::from_value(stored)?)
    }

    pub async fn delete_product(&self, id: &str) -> anyhow::Result<()> {
        self.store.delete(collections::PRODUCTS, id).await?;
        Ok(())
    }

    pub async fn get_product(&self, id: &str) -> anyhow::Result<Product> {
        let value = self.store.get(collections::PRODUCTS, id).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        let values = self.store.list(collections::PRODUCTS).await?;
        values
            .into_iter()
            .map(|value| Ok(serde_json::from_value(value)?))
            .collect()
    }
}
