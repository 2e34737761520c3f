use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::{
    ArrayUpdate, Collection, DeleteAck, DocumentStore, FindOptions, InsertAck, StoreError,
    UpdateAck,
};

/// In-process document store with the same query semantics as the hosted one.
///
/// Supports equality filters on top-level fields, inclusion/exclusion
/// projections, limits and the two array updates used by the category routes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`
    pub async fn len(&self, collection: Collection) -> usize {
        let collections = self.collections.read().await;
        collections.get(&collection).map_or(0, Vec::len)
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn is_truthy(value: &Bson) -> bool {
    match value {
        Bson::Boolean(b) => *b,
        Bson::Int32(i) => *i != 0,
        Bson::Int64(i) => *i != 0,
        Bson::Double(f) => *f != 0.0,
        Bson::Null | Bson::Undefined => false,
        _ => true,
    }
}

/// Apply a projection the way the store server does: inclusion mode as soon as
/// any non-`_id` field is set, with `_id` kept unless explicitly excluded.
fn project(document: &Document, projection: &Document) -> Document {
    let inclusion = projection
        .iter()
        .any(|(key, value)| key != "_id" && is_truthy(value));
    let id_excluded = projection.get("_id").is_some_and(|v| !is_truthy(v));

    document
        .iter()
        .filter(|(key, _)| {
            if key.as_str() == "_id" {
                return !id_excluded;
            }
            match projection.get(key.as_str()) {
                Some(flag) => is_truthy(flag),
                None => !inclusion,
            }
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn apply_update(document: &mut Document, update: &ArrayUpdate) -> Result<bool, StoreError> {
    match update {
        ArrayUpdate::Push { field, value } => match document.get_mut(field) {
            Some(Bson::Array(items)) => {
                items.push(value.clone());
                Ok(true)
            }
            Some(_) => Err(StoreError::InvalidUpdate(format!(
                "the field '{}' must be an array",
                field
            ))),
            None => {
                document.insert(field.clone(), Bson::Array(vec![value.clone()]));
                Ok(true)
            }
        },
        ArrayUpdate::Pull { field, matching } => match document.get_mut(field) {
            Some(Bson::Array(items)) => {
                let before = items.len();
                items.retain(|item| match item {
                    Bson::Document(element) => !matches(element, matching),
                    _ => true,
                });
                Ok(items.len() != before)
            }
            Some(_) => Err(StoreError::InvalidUpdate(format!(
                "cannot apply $pull to a non-array value at '{}'",
                field
            ))),
            None => Ok(false),
        },
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        // A limit of zero means "no limit" to the store server
        let limit = match options.limit {
            Some(n) if n > 0 => n as usize,
            _ => usize::MAX,
        };

        Ok(documents
            .iter()
            .filter(|doc| matches(doc, &filter))
            .take(limit)
            .map(|doc| match &options.projection {
                Some(projection) => project(doc, projection),
                None => doc.clone(),
            })
            .collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, &filter)))
            .cloned())
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertAck, StoreError> {
        let (inserted_id, stored) = match document.get("_id").cloned() {
            Some(id) => (id, document),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                let mut stored = doc! { "_id": id.clone() };
                stored.extend(document);
                (id, stored)
            }
        };

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();
        if documents.iter().any(|doc| doc.get("_id") == Some(&inserted_id)) {
            return Err(StoreError::Backend(format!(
                "E11000 duplicate key error collection: {} dup key: {{ _id: {} }}",
                collection, inserted_id
            )));
        }
        documents.push(stored);

        Ok(InsertAck {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        update: ArrayUpdate,
    ) -> Result<UpdateAck, StoreError> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| matches(doc, &filter)));

        match target {
            Some(document) => {
                let modified = apply_update(document, &update)?;
                Ok(UpdateAck::new(1, u64::from(modified)))
            }
            None => Ok(UpdateAck::new(0, 0)),
        }
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteAck, StoreError> {
        let mut collections = self.collections.write().await;
        let deleted_count = match collections.get_mut(&collection) {
            Some(docs) => match docs.iter().position(|doc| matches(doc, &filter)) {
                Some(index) => {
                    docs.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
