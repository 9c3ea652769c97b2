//! Posts, replies, likes and anonymous messages.
//!
//! All user text goes through the [`SubmissionGuard`] before it is stored.
//! When anything had to be masked the new content is handed to the
//! [`AutoReporter`] after it has been persisted.

use chrono::Utc;
use hushboard_common::{AppError, AppResult, id::IdGenerator};
use hushboard_db::{
    entities::{message, post, post_like, reply},
    repositories::{
        MessageRepository, PostLikeRepository, PostRepository, ReplyRepository,
    },
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use super::auto_report::AutoReporter;
use super::content_ref::ContentRef;
use super::submission_guard::SubmissionGuard;

/// Default page size for listings.
pub const DEFAULT_LIST_LIMIT: u64 = 20;

/// Largest page a caller may ask for.
pub const MAX_LIST_LIMIT: u64 = 100;

/// Newly stored content, plus whether screening masked any of it.
#[derive(Debug, Clone)]
pub struct Submission<T> {
    pub item: T,
    pub was_filtered: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 32))]
    pub board: String,
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    pub post_id: String,
    #[validate(length(min = 1, max = 120))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyInput {
    pub post_id: String,
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReplyInput {
    pub reply_id: String,
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageInput {
    #[validate(length(min = 1, max = 64))]
    pub recipient: String,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
}

/// Trim surrounding whitespace in place so that blank fields fail the
/// length check.
fn trim_in_place(field: &mut String) {
    let trimmed = field.trim();
    if trimmed.len() != field.len() {
        *field = trimmed.to_string();
    }
}

fn clamp_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

/// Content service.
#[derive(Clone)]
pub struct ContentService {
    post_repo: PostRepository,
    reply_repo: ReplyRepository,
    message_repo: MessageRepository,
    like_repo: PostLikeRepository,
    guard: SubmissionGuard,
    auto_reporter: AutoReporter,
    id_gen: IdGenerator,
}

impl ContentService {
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        reply_repo: ReplyRepository,
        message_repo: MessageRepository,
        like_repo: PostLikeRepository,
        guard: SubmissionGuard,
        auto_reporter: AutoReporter,
    ) -> Self {
        Self {
            post_repo,
            reply_repo,
            message_repo,
            like_repo,
            guard,
            auto_reporter,
            id_gen: IdGenerator::new(),
        }
    }

    // ==================== Posts ====================

    /// Create a post.
    pub async fn create_post(
        &self,
        user_id: &str,
        mut input: CreatePostInput,
    ) -> AppResult<Submission<post::Model>> {
        trim_in_place(&mut input.board);
        trim_in_place(&mut input.title);
        trim_in_place(&mut input.content);
        input.validate()?;

        let ([title, content], was_filtered) =
            self.guard.screen_all([input.title.as_str(), input.content.as_str()]);

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            board: Set(input.board.to_lowercase()),
            title: Set(title),
            content: Set(content),
            like_count: Set(0),
            comment_count: Set(0),
            created_at: Set(Utc::now().into()),
            edited_at: Set(None),
        };

        let post = self.post_repo.create(model).await?;
        info!(post_id = %post.id, board = %post.board, was_filtered, "Post created");

        if was_filtered {
            self.auto_reporter
                .flag(user_id, &ContentRef::Post { id: post.id.clone() })
                .await;
        }

        Ok(Submission {
            item: post,
            was_filtered,
        })
    }

    /// Edit one's own post.
    pub async fn edit_post(
        &self,
        user_id: &str,
        mut input: UpdatePostInput,
    ) -> AppResult<Submission<post::Model>> {
        if let Some(title) = input.title.as_mut() {
            trim_in_place(title);
        }
        if let Some(content) = input.content.as_mut() {
            trim_in_place(content);
        }
        input.validate()?;

        let post = self.post_repo.get_by_id(&input.post_id).await?;
        if post.user_id != user_id {
            return Err(AppError::Forbidden("Not the post owner".to_string()));
        }

        let mut was_filtered = false;
        let mut active: post::ActiveModel = post.into();

        if let Some(title) = input.title {
            let screened = self.guard.screen(&title);
            was_filtered |= screened.was_filtered;
            active.title = Set(screened.text);
        }
        if let Some(content) = input.content {
            let screened = self.guard.screen(&content);
            was_filtered |= screened.was_filtered;
            active.content = Set(screened.text);
        }
        active.edited_at = Set(Some(Utc::now().into()));

        let post = self.post_repo.update(active).await?;

        if was_filtered {
            self.auto_reporter
                .flag(user_id, &ContentRef::Post { id: post.id.clone() })
                .await;
        }

        Ok(Submission {
            item: post,
            was_filtered,
        })
    }

    /// Delete one's own post, along with its replies and likes.
    pub async fn delete_own_post(&self, user_id: &str, post_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;
        if post.user_id != user_id {
            return Err(AppError::Forbidden("Not the post owner".to_string()));
        }

        self.post_repo.delete(post_id).await?;
        info!(post_id = %post_id, "Post deleted by owner");
        Ok(())
    }

    pub async fn get_post(&self, post_id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(post_id).await
    }

    /// Posts newest first, optionally on one board, paging back from `until_id`.
    pub async fn list_posts(
        &self,
        board: Option<&str>,
        limit: Option<u64>,
        until_id: Option<&str>,
    ) -> AppResult<Vec<post::Model>> {
        let board = board.map(str::to_lowercase);
        self.post_repo
            .find_recent(board.as_deref(), until_id, clamp_limit(limit))
            .await
    }

    // ==================== Likes ====================

    /// Like a post. Liking twice is a no-op. Returns the current like count.
    pub async fn like_post(&self, user_id: &str, post_id: &str) -> AppResult<i32> {
        let post = self.post_repo.get_by_id(post_id).await?;

        if self.like_repo.has_liked(user_id, post_id).await? {
            return Ok(post.like_count);
        }

        let model = post_like::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            user_id: Set(user_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        if let Err(e) = self.like_repo.create(model).await {
            // A concurrent like from the same user won the unique index.
            if self.like_repo.has_liked(user_id, post_id).await? {
                return Ok(post.like_count);
            }
            return Err(e);
        }
        self.post_repo.increment_like_count(post_id).await?;

        Ok(self.post_repo.get_by_id(post_id).await?.like_count)
    }

    /// Remove a like. Unliking a post that was not liked is a no-op.
    pub async fn unlike_post(&self, user_id: &str, post_id: &str) -> AppResult<i32> {
        let post = self.post_repo.get_by_id(post_id).await?;

        if !self.like_repo.delete_by_user_and_post(user_id, post_id).await? {
            return Ok(post.like_count);
        }
        self.post_repo.decrement_like_count(post_id).await?;

        Ok(self.post_repo.get_by_id(post_id).await?.like_count)
    }

    // ==================== Replies ====================

    /// Reply to a post.
    pub async fn create_reply(
        &self,
        user_id: &str,
        mut input: CreateReplyInput,
    ) -> AppResult<Submission<reply::Model>> {
        trim_in_place(&mut input.content);
        input.validate()?;

        // Parent must exist.
        self.post_repo.get_by_id(&input.post_id).await?;

        let screened = self.guard.screen(&input.content);

        let model = reply::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(input.post_id.clone()),
            user_id: Set(user_id.to_string()),
            content: Set(screened.text),
            is_deleted: Set(false),
            created_at: Set(Utc::now().into()),
            edited_at: Set(None),
        };

        let reply = self.reply_repo.create(model).await?;

        if screened.was_filtered {
            self.auto_reporter
                .flag(
                    user_id,
                    &ContentRef::Reply {
                        id: reply.id.clone(),
                        parent_id: reply.post_id.clone(),
                    },
                )
                .await;
        }

        // The reply is stored; a stale counter does not undo that.
        if let Err(e) = self.post_repo.increment_comment_count(&reply.post_id).await {
            warn!(post_id = %reply.post_id, error = %e, "Failed to bump comment count");
        }

        Ok(Submission {
            item: reply,
            was_filtered: screened.was_filtered,
        })
    }

    /// Edit one's own reply. Deleted replies cannot be edited.
    pub async fn edit_reply(
        &self,
        user_id: &str,
        mut input: UpdateReplyInput,
    ) -> AppResult<Submission<reply::Model>> {
        trim_in_place(&mut input.content);
        input.validate()?;

        let reply = self.reply_repo.get_by_id(&input.reply_id).await?;
        if reply.user_id != user_id {
            return Err(AppError::Forbidden("Not the reply owner".to_string()));
        }
        if reply.is_deleted {
            return Err(AppError::BadRequest("Reply has been deleted".to_string()));
        }

        let screened = self.guard.screen(&input.content);
        let mut active: reply::ActiveModel = reply.into();
        active.content = Set(screened.text);
        active.edited_at = Set(Some(Utc::now().into()));

        let reply = self.reply_repo.update(active).await?;

        if screened.was_filtered {
            self.auto_reporter
                .flag(
                    user_id,
                    &ContentRef::Reply {
                        id: reply.id.clone(),
                        parent_id: reply.post_id.clone(),
                    },
                )
                .await;
        }

        Ok(Submission {
            item: reply,
            was_filtered: screened.was_filtered,
        })
    }

    /// Replace one's own reply with the tombstone.
    pub async fn delete_own_reply(&self, user_id: &str, reply_id: &str) -> AppResult<()> {
        let reply = self.reply_repo.get_by_id(reply_id).await?;
        if reply.user_id != user_id {
            return Err(AppError::Forbidden("Not the reply owner".to_string()));
        }

        self.reply_repo.tombstone(reply_id, Some(&reply.post_id)).await?;
        info!(reply_id = %reply_id, "Reply deleted by owner");
        Ok(())
    }

    /// Replies under a post, oldest first.
    pub async fn list_replies(&self, post_id: &str, limit: Option<u64>) -> AppResult<Vec<reply::Model>> {
        self.reply_repo.find_by_post(post_id, clamp_limit(limit)).await
    }

    // ==================== Messages ====================

    /// Send an anonymous message to a named recipient.
    ///
    /// Only the body is screened. The recipient is the lookup key for
    /// [`Self::list_messages_for`] and is stored lowercased as given.
    pub async fn create_message(
        &self,
        user_id: &str,
        mut input: CreateMessageInput,
    ) -> AppResult<Submission<message::Model>> {
        trim_in_place(&mut input.recipient);
        trim_in_place(&mut input.content);
        input.validate()?;

        let screened = self.guard.screen(&input.content);
        let was_filtered = screened.was_filtered;

        let model = message::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            recipient: Set(input.recipient.to_lowercase()),
            content: Set(screened.text),
            created_at: Set(Utc::now().into()),
        };

        let message = self.message_repo.create(model).await?;
        info!(message_id = %message.id, was_filtered, "Message created");

        if was_filtered {
            self.auto_reporter
                .flag(user_id, &ContentRef::Message { id: message.id.clone() })
                .await;
        }

        Ok(Submission {
            item: message,
            was_filtered,
        })
    }

    /// Messages addressed to `recipient`, newest first. Names match
    /// case-insensitively.
    pub async fn list_messages_for(
        &self,
        recipient: &str,
        limit: Option<u64>,
    ) -> AppResult<Vec<message::Model>> {
        let recipient = recipient.trim().to_lowercase();
        self.message_repo
            .find_by_recipient(&recipient, clamp_limit(limit))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::{moderation_log::ModerationLogService, report::ReportService};
    use hushboard_db::repositories::{ModerationLogRepository, ReportRepository};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> ContentService {
        let db = Arc::new(db.into_connection());
        ContentService::new(
            PostRepository::new(Arc::clone(&db)),
            ReplyRepository::new(Arc::clone(&db)),
            MessageRepository::new(Arc::clone(&db)),
            PostLikeRepository::new(Arc::clone(&db)),
            SubmissionGuard::builtin(),
            AutoReporter::new(
                ReportService::new(ReportRepository::new(Arc::clone(&db))),
                ModerationLogService::new(ModerationLogRepository::new(db)),
            ),
        )
    }

    fn create_test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            board: "general".to_string(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            like_count: 0,
            comment_count: 0,
            created_at: Utc::now().into(),
            edited_at: None,
        }
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(1000)), MAX_LIST_LIMIT);
    }

    #[tokio::test]
    async fn test_create_post_rejects_blank_title() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create_post(
                "user1",
                CreatePostInput {
                    board: "general".to_string(),
                    title: "   ".to_string(),
                    content: "Body".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_message_too_long() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service
            .create_message(
                "user1",
                CreateMessageInput {
                    recipient: "alex".to_string(),
                    content: "a".repeat(1001),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_edit_post_requires_owner() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("post1", "owner")]]),
        );

        let result = service
            .edit_post(
                "intruder",
                UpdatePostInput {
                    post_id: "post1".to_string(),
                    title: None,
                    content: Some("Changed".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_like_post_twice_is_noop() {
        let mut post = create_test_post("post1", "owner");
        post.like_count = 1;
        let like = post_like::Model {
            id: "like1".to_string(),
            post_id: "post1".to_string(),
            user_id: "user1".to_string(),
            created_at: Utc::now().into(),
        };
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_query_results([[like]]),
        );

        let count = service.like_post("user1", "post1").await.unwrap();

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_like_post_concurrent_duplicate_is_noop() {
        let mut post = create_test_post("post1", "owner");
        post.like_count = 1;
        let like = post_like::Model {
            id: "like1".to_string(),
            post_id: "post1".to_string(),
            user_id: "user1".to_string(),
            created_at: Utc::now().into(),
        };
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_query_results([Vec::<post_like::Model>::new()])
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "duplicate key value violates unique constraint".to_string(),
                ))])
                .append_query_results([[like]]),
        );

        let count = service.like_post("user1", "post1").await.unwrap();

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_like_post_insert_failure_propagates() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("post1", "owner")]])
                .append_query_results([Vec::<post_like::Model>::new()])
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "connection reset".to_string(),
                ))])
                .append_query_results([Vec::<post_like::Model>::new()]),
        );

        let result = service.like_post("user1", "post1").await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
