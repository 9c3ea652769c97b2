//! Reply repository.

use std::sync::Arc;

use super::id_batches;
use crate::entities::{Reply, reply};
use hushboard_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Reply repository for database operations.
#[derive(Clone)]
pub struct ReplyRepository {
    db: Arc<DatabaseConnection>,
}

impl ReplyRepository {
    /// Create a new reply repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a reply by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<reply::Model>> {
        Reply::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a reply by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<reply::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reply {id} not found")))
    }

    /// Find replies by IDs, querying in batches. Missing ids are skipped.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<reply::Model>> {
        let mut replies = Vec::with_capacity(ids.len());

        for batch in id_batches(ids) {
            let found = Reply::find()
                .filter(reply::Column::Id.is_in(batch))
                .all(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            replies.extend(found);
        }

        Ok(replies)
    }

    /// Replies under a post, oldest first.
    pub async fn find_by_post(&self, post_id: &str, limit: u64) -> AppResult<Vec<reply::Model>> {
        Reply::find()
            .filter(reply::Column::PostId.eq(post_id))
            .order_by_asc(reply::Column::CreatedAt)
            .order_by_asc(reply::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new reply.
    pub async fn create(&self, model: reply::ActiveModel) -> AppResult<reply::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a reply.
    pub async fn update(&self, model: reply::ActiveModel) -> AppResult<reply::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace a reply's content with the tombstone and mark it deleted.
    ///
    /// When `post_id` is given the reply must belong to that post. Returns
    /// `false` if no matching reply exists.
    pub async fn tombstone(&self, id: &str, post_id: Option<&str>) -> AppResult<bool> {
        let mut update = Reply::update_many()
            .set(reply::ActiveModel {
                content: Set(reply::TOMBSTONE_TEXT.to_string()),
                is_deleted: Set(true),
                ..Default::default()
            })
            .filter(reply::Column::Id.eq(id));

        if let Some(post_id) = post_id {
            update = update.filter(reply::Column::PostId.eq(post_id));
        }

        let result = update
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }
}
