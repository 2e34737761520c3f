use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Database};
use tracing::info;

use super::{
    ArrayUpdate, Collection, DeleteAck, DocumentStore, FindOptions, InsertAck, StoreError,
    UpdateAck,
};

/// Store backed by the hosted MongoDB cluster.
///
/// The client is cheap to clone and pools its own connections, so a single
/// instance is shared by every request.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)?;
        let store = Self {
            database: client.database(database_name),
            client,
        };

        store.ping().await?;
        info!("Connected to document store database '{}'", database_name);
        Ok(store)
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.database.collection::<Document>(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(
        &self,
        collection: Collection,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let mut find_options = mongodb::options::FindOptions::default();
        find_options.projection = options.projection;
        find_options.limit = options.limit;

        let cursor = self
            .collection(collection)
            .find(filter)
            .with_options(find_options)
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertAck, StoreError> {
        let result = self.collection(collection).insert_one(document).await?;
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: result.inserted_id,
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        update: ArrayUpdate,
    ) -> Result<UpdateAck, StoreError> {
        let result = self
            .collection(collection)
            .update_one(filter, update.to_document())
            .await?;

        let mut ack = UpdateAck::new(result.matched_count, result.modified_count);
        if let Some(id) = result.upserted_id {
            ack.upserted_id = id;
            ack.upserted_count = 1;
        }
        Ok(ack)
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteAck, StoreError> {
        let result = self.collection(collection).delete_one(filter).await?;
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
