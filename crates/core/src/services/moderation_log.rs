//! Append-only moderation audit trail.

use chrono::{SecondsFormat, Utc};
use hushboard_common::{AppResult, id::IdGenerator};
use hushboard_db::{
    entities::moderation_log::{self, ModerationAction},
    repositories::ModerationLogRepository,
};
use sea_orm::Set;
use tracing::error;

/// Moderation log service.
#[derive(Clone)]
pub struct ModerationLogService {
    log_repo: ModerationLogRepository,
    id_gen: IdGenerator,
}

impl ModerationLogService {
    #[must_use]
    pub const fn new(log_repo: ModerationLogRepository) -> Self {
        Self {
            log_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append an entry.
    ///
    /// The log is best-effort: a failed write is reported through tracing
    /// and never surfaces to the caller.
    pub async fn log_action(
        &self,
        admin_id: &str,
        action: ModerationAction,
        target_id: &str,
        details: &str,
    ) {
        let now = Utc::now();
        let model = moderation_log::ActiveModel {
            id: Set(self.id_gen.generate()),
            admin_id: Set(admin_id.to_string()),
            action: Set(action),
            target_id: Set(target_id.to_string()),
            details: Set(details.to_string()),
            created_at: Set(now.into()),
            logged_at: Set(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        };

        if let Err(e) = self.log_repo.create(model).await {
            error!(
                error = %e,
                admin_id = %admin_id,
                action = ?action,
                target_id = %target_id,
                "Failed to write moderation log entry"
            );
        }
    }

    /// Every entry, newest first.
    pub async fn list_all(&self) -> AppResult<Vec<moderation_log::Model>> {
        self.log_repo.find_recent(None).await
    }

    /// The most recent `limit` entries.
    pub async fn list_recent(&self, limit: u64) -> AppResult<Vec<moderation_log::Model>> {
        self.log_repo.find_recent(Some(limit)).await
    }

    pub async fn list_for_target(&self, target_id: &str) -> AppResult<Vec<moderation_log::Model>> {
        self.log_repo.find_by_target(target_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hushboard_common::AppError;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use std::sync::Arc;

    fn entry(id: &str, action: ModerationAction) -> moderation_log::Model {
        let now = Utc::now();
        moderation_log::Model {
            id: id.to_string(),
            admin_id: "admin1".to_string(),
            action,
            target_id: "post1".to_string(),
            details: "Reason: Spam".to_string(),
            created_at: now.into(),
            logged_at: now.to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_log_action_swallows_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("disk full".to_string())])
            .into_connection();
        let service = ModerationLogService::new(ModerationLogRepository::new(Arc::new(db)));

        service
            .log_action("admin1", ModerationAction::KeepContent, "post1", "Reason: Spam")
            .await;
    }

    #[tokio::test]
    async fn test_list_all_propagates_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let service = ModerationLogService::new(ModerationLogRepository::new(Arc::new(db)));

        let result = service.list_all().await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_list_all() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                entry("log2", ModerationAction::DeleteContent),
                entry("log1", ModerationAction::KeepContent),
            ]])
            .into_connection();
        let service = ModerationLogService::new(ModerationLogRepository::new(Arc::new(db)));

        let entries = service.list_all().await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, ModerationAction::DeleteContent);
    }
}
