//! Admin review of pending reports.
//!
//! Every operation re-reads the caller's stored role before doing anything.

use hushboard_common::{AppError, AppResult};
use hushboard_db::{
    entities::{
        moderation_log::{self, ModerationAction},
        report::{self, ReportStatus},
        user,
    },
    repositories::UserRepository,
};
use serde::Serialize;
use tracing::{info, warn};

use super::content_ref::{ContentRef, ContentSnapshot, ContentStore};
use super::moderation_log::ModerationLogService;
use super::report::ReportService;

/// A pending report joined with the content it points at.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub report: report::Model,
    /// `None` when the content has already been deleted.
    pub content: Option<ContentSnapshot>,
}

/// Result of deleting reported content.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub report: report::Model,
    /// `false` if the content was already gone.
    pub content_removed: bool,
}

/// Admin review workflow.
#[derive(Clone)]
pub struct AdminReviewService {
    user_repo: UserRepository,
    report_service: ReportService,
    content_store: ContentStore,
    log_service: ModerationLogService,
}

impl AdminReviewService {
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        report_service: ReportService,
        content_store: ContentStore,
        log_service: ModerationLogService,
    ) -> Self {
        Self {
            user_repo,
            report_service,
            content_store,
            log_service,
        }
    }

    /// Load `user_id` and check it holds the admin role.
    pub async fn require_admin(&self, user_id: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Admin access required".to_string()))?;

        if !user.is_admin() {
            warn!(user_id = %user_id, "Non-admin attempted a moderation action");
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(user)
    }

    /// Pending reports, newest first, each with its live content.
    pub async fn list_pending_reviews(&self, admin_id: &str) -> AppResult<Vec<ReviewItem>> {
        self.require_admin(admin_id).await?;

        let reports = self.report_service.list_pending().await?;

        let targets: Vec<(report::Model, Option<ContentRef>)> = reports
            .into_iter()
            .map(|r| {
                let target = ContentRef::from_report(&r).ok();
                (r, target)
            })
            .collect();

        let content = self
            .content_store
            .fetch_many(targets.iter().filter_map(|(_, t)| t.as_ref()))
            .await?;

        let items = targets
            .into_iter()
            .map(|(report, target)| {
                let snapshot = target.and_then(|t| {
                    content.get(t.id()).filter(|s| s.matches(&t)).cloned()
                });
                ReviewItem {
                    report,
                    content: snapshot,
                }
            })
            .collect();

        Ok(items)
    }

    /// Keep the content and dismiss the report.
    pub async fn keep(&self, admin_id: &str, report_id: &str) -> AppResult<report::Model> {
        self.require_admin(admin_id).await?;

        let report = self
            .report_service
            .resolve(report_id, ReportStatus::Dismissed, admin_id)
            .await?;

        self.log_service
            .log_action(
                admin_id,
                ModerationAction::KeepContent,
                &report.target_id,
                &format!("Reason: {}", report.reason),
            )
            .await;

        info!(report_id = %report_id, admin_id = %admin_id, "Kept reported content");

        Ok(report)
    }

    /// Delete the reported content and resolve the report.
    ///
    /// Runs in order: content removal, report resolution, log entry. If the
    /// removal fails the report stays pending. Content that is already gone
    /// is not an error; a reply found under another post is.
    pub async fn delete(&self, admin_id: &str, report_id: &str) -> AppResult<DeleteOutcome> {
        self.require_admin(admin_id).await?;

        let report = self.report_service.get_report(report_id).await?;
        if report.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Report {report_id} is already closed"
            )));
        }

        let target = ContentRef::from_report(&report)?;
        let content_removed = self.content_store.remove(&target).await?;
        if !content_removed {
            info!(
                report_id = %report_id,
                target_id = %target.id(),
                "Reported content already deleted"
            );
        }

        let report = self
            .report_service
            .resolve(report_id, ReportStatus::Resolved, admin_id)
            .await?;

        self.log_service
            .log_action(
                admin_id,
                ModerationAction::DeleteContent,
                target.id(),
                &format!("Type: {}, Reason: {}", target.kind(), report.reason),
            )
            .await;

        info!(
            report_id = %report_id,
            admin_id = %admin_id,
            target_type = %target.kind(),
            "Deleted reported content"
        );

        Ok(DeleteOutcome {
            report,
            content_removed,
        })
    }

    /// The moderation log, newest first.
    pub async fn list_logs(&self, admin_id: &str) -> AppResult<Vec<moderation_log::Model>> {
        self.require_admin(admin_id).await?;
        self.log_service.list_all().await
    }

    /// Reports and log entries for one piece of content.
    pub async fn history(
        &self,
        admin_id: &str,
        target_id: &str,
    ) -> AppResult<(Vec<report::Model>, Vec<moderation_log::Model>)> {
        self.require_admin(admin_id).await?;
        futures::try_join!(
            self.report_service.list_for_target(target_id),
            self.log_service.list_for_target(target_id),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hushboard_db::entities::user::UserRole;
    use hushboard_db::repositories::{
        MessageRepository, ModerationLogRepository, PostRepository, ReplyRepository,
        ReportRepository,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            display_name: None,
            is_anonymous: false,
            role,
            created_at: Utc::now().into(),
            last_seen_at: Utc::now().into(),
        }
    }

    fn service(db: MockDatabase) -> AdminReviewService {
        let db = Arc::new(db.into_connection());
        AdminReviewService::new(
            UserRepository::new(Arc::clone(&db)),
            ReportService::new(ReportRepository::new(Arc::clone(&db))),
            ContentStore::new(
                PostRepository::new(Arc::clone(&db)),
                MessageRepository::new(Arc::clone(&db)),
                ReplyRepository::new(Arc::clone(&db)),
            ),
            ModerationLogService::new(ModerationLogRepository::new(db)),
        )
    }

    #[tokio::test]
    async fn test_require_admin_rejects_user() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("user1", UserRole::User)]]),
        );

        let result = service.keep("user1", "report1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_require_admin_rejects_unknown() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let result = service.list_logs("ghost").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_require_admin_accepts_admin() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_user("admin1", UserRole::Admin)]]),
        );

        let admin = service.require_admin("admin1").await.unwrap();

        assert!(admin.is_admin());
    }
}
