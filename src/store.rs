//! Generic JSON CRUD access to the remote resource store.
//!
//! The store exposes one collection per entity type and speaks plain
//! REST verbs. [`HttpStore`] is the [`reqwest`]-backed implementation;
//! tests swap in [`crate::memory::MemoryStore`] through the
//! [`RemoteStore`] trait.

use async_trait::async_trait;
use serde_json::Value;

/// Collection names, one per entity type.
pub mod collections {
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
    pub const PRODUCT_APPROVALS: &str = "productApprovals";
    pub const ORDER_APPROVALS: &str = "orderApprovals";
    pub const USERS: &str = "users";
}

/// Errors from the remote store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store returned a non-2xx status code. No retry is attempted.
    #[error("store error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The requested item does not exist in the collection.
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// The store answered with a payload we could not decode.
    #[error("failed to decode store payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Generic JSON CRUD accessor over named resource collections.
///
/// Identity is carried purely in payload fields; the store performs no
/// server-side enforcement of who the caller is.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All items of a collection, in store insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// Fetch a single item by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Value, StoreError>;

    /// Insert a new item. The caller assigns the id; the stored item is returned.
    async fn create(&self, collection: &str, item: &Value) -> Result<Value, StoreError>;

    /// Partial merge-write of the given top-level fields.
    async fn patch(&self, collection: &str, id: &str, changes: &Value) -> Result<Value, StoreError>;

    /// Full replace of an existing item.
    async fn put(&self, collection: &str, id: &str, item: &Value) -> Result<Value, StoreError>;

    /// Remove an item from a collection.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// HTTP client for the remote resource store.
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    /// Create a new store client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a store client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn item_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    // Map 404 to NotFound and any other non-2xx status to Api.
    async fn check(
        response: reqwest::Response,
        collection: &str,
        id: Option<&str>,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            }
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let response = self
            .client
            .get(self.collection_url(collection))
            .send()
            .await?;
        let response = Self::check(response, collection, None).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let response = self.client.get(self.item_url(collection, id)).send().await?;
        let response = Self::check(response, collection, Some(id)).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, collection: &str, item: &Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(self.collection_url(collection))
            .json(item)
            .send()
            .await?;
        let response = Self::check(response, collection, None).await?;
        Ok(response.json().await?)
    }

    async fn patch(&self, collection: &str, id: &str, changes: &Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .patch(self.item_url(collection, id))
            .json(changes)
            .send()
            .await?;
        let response = Self::check(response, collection, Some(id)).await?;
        Ok(response.json().await?)
    }

    async fn put(&self, collection: &str, id: &str, item: &Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .put(self.item_url(collection, id))
            .json(item)
            .send()
            .await?;
        let response = Self::check(response, collection, Some(id)).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.item_url(collection, id))
            .send()
            .await?;
        Self::check(response, collection, Some(id)).await?;
        Ok(())
    }
}
