//! Message repository.

use std::sync::Arc;

use super::id_batches;
use crate::entities::{Message, message};
use hushboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Message repository for database operations.
#[derive(Clone)]
pub struct MessageRepository {
    db: Arc<DatabaseConnection>,
}

impl MessageRepository {
    /// Create a new message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a message by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<message::Model>> {
        Message::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find messages by IDs, querying in batches. Missing ids are skipped.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<message::Model>> {
        let mut messages = Vec::with_capacity(ids.len());

        for batch in id_batches(ids) {
            let found = Message::find()
                .filter(message::Column::Id.is_in(batch))
                .all(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            messages.extend(found);
        }

        Ok(messages)
    }

    /// Messages addressed to a recipient, newest first.
    pub async fn find_by_recipient(
        &self,
        recipient: &str,
        limit: u64,
    ) -> AppResult<Vec<message::Model>> {
        Message::find()
            .filter(message::Column::Recipient.eq(recipient))
            .order_by_desc(message::Column::CreatedAt)
            .order_by_desc(message::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new message.
    pub async fn create(&self, model: message::ActiveModel) -> AppResult<message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a message. Returns `false` if it did not exist.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Message::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }
}
