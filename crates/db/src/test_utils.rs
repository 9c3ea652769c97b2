//! Test utilities for database operations.
//!
//! [`TestDatabase::in_memory`] gives every test its own `SQLite` database
//! with the real migrations applied.

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// A migrated, throwaway database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Create a fresh in-memory `SQLite` database and run all migrations.
    pub async fn in_memory() -> Result<Self, DbErr> {
        // An in-memory SQLite database lives and dies with its connection,
        // so the pool is pinned to exactly one.
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        crate::migrate(&conn)
            .await
            .map_err(|e| DbErr::Migration(e.to_string()))?;

        info!("Created in-memory test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Shared handle for constructing repositories.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::{
        report::{ContentKind, ReportStatus},
        user::UserRole,
        post, report, user,
    };
    use crate::repositories::{PostRepository, ReportRepository, UserRepository};
    use chrono::Utc;
    use sea_orm::ActiveValue::Set;

    #[tokio::test]
    async fn test_migrations_apply() {
        let db = TestDatabase::in_memory().await.unwrap();
        let reports = ReportRepository::new(db.connection());

        assert_eq!(reports.count_pending().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_close_pending_only_once() {
        let db = TestDatabase::in_memory().await.unwrap();
        let reports = ReportRepository::new(db.connection());

        reports
            .create(report::ActiveModel {
                id: Set("report1".to_string()),
                target_id: Set("post1".to_string()),
                target_type: Set(ContentKind::Post),
                parent_id: Set(None),
                reason: Set("Spam".to_string()),
                reporter_id: Set(None),
                status: Set(ReportStatus::Pending),
                created_at: Set(Utc::now().into()),
                resolved_by: Set(None),
                resolved_at: Set(None),
            })
            .await
            .unwrap();

        let first = reports
            .close_pending("report1", ReportStatus::Resolved, "admin1", Utc::now().into())
            .await
            .unwrap();
        let second = reports
            .close_pending("report1", ReportStatus::Dismissed, "admin2", Utc::now().into())
            .await
            .unwrap();

        assert!(first);
        assert!(!second);

        let stored = reports.get_by_id("report1").await.unwrap();
        assert_eq!(stored.status, ReportStatus::Resolved);
        assert_eq!(stored.resolved_by.as_deref(), Some("admin1"));
    }

    #[tokio::test]
    async fn test_post_counters() {
        let db = TestDatabase::in_memory().await.unwrap();
        let users = UserRepository::new(db.connection());
        let posts = PostRepository::new(db.connection());

        users
            .create(user::ActiveModel {
                id: Set("uid1".to_string()),
                display_name: Set(None),
                is_anonymous: Set(true),
                role: Set(UserRole::User),
                created_at: Set(Utc::now().into()),
                last_seen_at: Set(Utc::now().into()),
            })
            .await
            .unwrap();

        posts
            .create(post::ActiveModel {
                id: Set("post1".to_string()),
                user_id: Set("uid1".to_string()),
                board: Set("general".to_string()),
                title: Set("t".to_string()),
                content: Set("c".to_string()),
                like_count: Set(0),
                comment_count: Set(0),
                created_at: Set(Utc::now().into()),
                edited_at: Set(None),
            })
            .await
            .unwrap();

        posts.decrement_like_count("post1").await.unwrap();
        posts.increment_like_count("post1").await.unwrap();
        posts.increment_comment_count("post1").await.unwrap();

        let stored = posts.get_by_id("post1").await.unwrap();
        assert_eq!(stored.like_count, 1);
        assert_eq!(stored.comment_count, 1);
    }
}
