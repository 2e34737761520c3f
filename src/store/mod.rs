//! Document store client.
//!
//! Handlers and the authorization layer talk to persistence only through
//! [`DocumentStore`]. Two backends exist: [`mongo::MongoStore`] for the hosted
//! cluster and [`memory::MemoryStore`] for tests and local runs.

pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::Serialize;
use thiserror::Error;

use crate::api::format::serialize_bson;
use crate::config::{DatabaseConfig, StoreBackend};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid document id: {0}")]
    InvalidObjectId(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("update rejected: {0}")]
    InvalidUpdate(String),

    #[error("store backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// The four named collections this service reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Categories,
    Activities,
    Users,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Categories => "category",
            Collection::Activities => "activities",
            Collection::Users => "users",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub projection: Option<Document>,
    pub limit: Option<i64>,
}

impl FindOptions {
    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Array mutations applied by `update_one`.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayUpdate {
    /// Append `value` to the array at `field`, creating it when absent.
    Push { field: String, value: Bson },
    /// Remove every element of `field` whose keys equal all entries of `matching`.
    Pull { field: String, matching: Document },
}

impl ArrayUpdate {
    pub fn push(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        ArrayUpdate::Push {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn pull(field: impl Into<String>, matching: Document) -> Self {
        ArrayUpdate::Pull {
            field: field.into(),
            matching,
        }
    }

    /// Update operator document understood by the store server
    pub fn to_document(&self) -> Document {
        let mut inner = Document::new();
        let mut update = Document::new();
        match self {
            ArrayUpdate::Push { field, value } => {
                inner.insert(field.clone(), value.clone());
                update.insert("$push", inner);
            }
            ArrayUpdate::Pull { field, matching } => {
                inner.insert(field.clone(), matching.clone());
                update.insert("$pull", inner);
            }
        }
        update
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    #[serde(serialize_with = "serialize_bson")]
    pub inserted_id: Bson,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(serialize_with = "serialize_bson")]
    pub upserted_id: Bson,
    pub upserted_count: u64,
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id: Bson::Null,
            upserted_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Persistence seam. Every handler performs exactly one call on it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(
        &self,
        collection: Collection,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertAck, StoreError>;

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        update: ArrayUpdate,
    ) -> Result<UpdateAck, StoreError>;

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteAck, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

pub type SharedStore = Arc<dyn DocumentStore>;

/// Parse a path segment into a store identifier
pub fn parse_object_id(raw: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(raw).map_err(|_| StoreError::InvalidObjectId(raw.to_string()))
}

/// Build the configured backend. The mongo backend connects and pings once.
pub async fn connect(config: &DatabaseConfig) -> Result<SharedStore, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Mongo => {
            let uri = config
                .connection_uri()
                .map_err(|e| StoreError::Backend(format!("invalid connection string: {}", e)))?;
            let store = MongoStore::connect(&uri, &config.name).await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn push_and_pull_render_update_operators() {
        let push = ArrayUpdate::push("subCategories", doc! { "subcategorySlug": "tea" });
        assert_eq!(
            push.to_document(),
            doc! { "$push": { "subCategories": { "subcategorySlug": "tea" } } }
        );

        let pull = ArrayUpdate::pull("subCategories", doc! { "subcategorySlug": "tea" });
        assert_eq!(
            pull.to_document(),
            doc! { "$pull": { "subCategories": { "subcategorySlug": "tea" } } }
        );
    }

    #[test]
    fn parse_object_id_rejects_non_hex() {
        assert!(parse_object_id("65a1b2c3d4e5f60718293a4b").is_ok());
        assert!(matches!(
            parse_object_id("not-an-id"),
            Err(StoreError::InvalidObjectId(v)) if v == "not-an-id"
        ));
    }

    #[test]
    fn acknowledgments_serialize_in_camel_case() {
        let ack = serde_json::to_value(UpdateAck::new(1, 0)).unwrap();
        assert_eq!(
            ack,
            serde_json::json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 0,
                "upsertedId": null,
                "upsertedCount": 0
            })
        );

        let oid = ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap();
        let ack = serde_json::to_value(InsertAck {
            acknowledged: true,
            inserted_id: Bson::ObjectId(oid),
        })
        .unwrap();
        assert_eq!(ack["insertedId"], "65a1b2c3d4e5f60718293a4b");
    }
}
