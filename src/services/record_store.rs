use crate::{database::MongoDB, utils::StoreError};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};

/// Access to user-scoped rows, one named collection at a time.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Removes every row of `collection` tagged with `user_id`. Returns how many were removed.
    async fn delete_where(&self, collection: &str, user_id: &str) -> Result<u64, StoreError>;

    /// Reads every row of `collection` tagged with `user_id`.
    async fn select_where(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Vec<serde_json::Value>, StoreError>;
}

/// MongoDB-backed store. Rows are rendered as relaxed extended JSON.
#[derive(Clone)]
pub struct MongoRecordStore {
    db: MongoDB,
}

impl MongoRecordStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl RecordStore for MongoRecordStore {
    async fn delete_where(&self, collection: &str, user_id: &str) -> Result<u64, StoreError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .delete_many(doc! { "user_id": user_id })
            .await?;

        Ok(result.deleted_count)
    }

    async fn select_where(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(doc! { "user_id": user_id })
            .await?;

        let rows: Vec<Document> = cursor.try_collect().await?;

        Ok(rows
            .into_iter()
            .map(|row| Bson::Document(row).into_relaxed_extjson())
            .collect())
    }
}
