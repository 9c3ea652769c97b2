//! Report ledger.

use std::fmt;

use chrono::Utc;
use hushboard_common::{AppError, AppResult, id::IdGenerator};
use hushboard_db::{
    entities::report::{self, ReportStatus},
    repositories::ReportRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::content_ref::ContentRef;

/// Reason recorded on reports raised by the lexicon.
pub const AUTO_REPORT_REASON: &str = "Automatic: profanity detected";

/// Reason code chosen from the report form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Spam,
    Harassment,
    HateSpeech,
    Inappropriate,
    Misinformation,
    Other,
}

/// Why a user reported something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportReason {
    Spam,
    Harassment,
    HateSpeech,
    Inappropriate,
    Misinformation,
    Other(String),
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spam => f.write_str("Spam"),
            Self::Harassment => f.write_str("Harassment"),
            Self::HateSpeech => f.write_str("Hate speech"),
            Self::Inappropriate => f.write_str("Inappropriate content"),
            Self::Misinformation => f.write_str("Misinformation"),
            Self::Other(text) => write!(f, "Other: {text}"),
        }
    }
}

/// Input for filing a report.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportInput {
    pub target: ContentRef,
    pub reason: ReasonCode,
    /// Free text, required when `reason` is `other`.
    #[validate(length(max = 500))]
    pub details: Option<String>,
}

impl CreateReportInput {
    /// Resolve the reason code and details into a [`ReportReason`].
    pub fn report_reason(&self) -> AppResult<ReportReason> {
        Ok(match self.reason {
            ReasonCode::Spam => ReportReason::Spam,
            ReasonCode::Harassment => ReportReason::Harassment,
            ReasonCode::HateSpeech => ReportReason::HateSpeech,
            ReasonCode::Inappropriate => ReportReason::Inappropriate,
            ReasonCode::Misinformation => ReportReason::Misinformation,
            ReasonCode::Other => {
                let text = self.details.as_deref().map(str::trim).unwrap_or_default();
                if text.is_empty() {
                    return Err(AppError::Validation(
                        "Please describe the reason for this report".to_string(),
                    ));
                }
                ReportReason::Other(text.to_string())
            }
        })
    }
}

/// Report ledger service.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(report_repo: ReportRepository) -> Self {
        Self {
            report_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// File a user report.
    pub async fn submit(
        &self,
        reporter_id: &str,
        input: CreateReportInput,
    ) -> AppResult<report::Model> {
        input.validate()?;
        let reason = input.report_reason()?;
        self.create_report(&input.target, &reason.to_string(), Some(reporter_id))
            .await
    }

    /// Record a pending report against `target`.
    ///
    /// The target is not checked for existence.
    pub async fn create_report(
        &self,
        target: &ContentRef,
        reason: &str,
        reporter_id: Option<&str>,
    ) -> AppResult<report::Model> {
        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            target_id: Set(target.id().to_string()),
            target_type: Set(target.kind()),
            parent_id: Set(target.parent_id().map(str::to_string)),
            reason: Set(reason.to_string()),
            reporter_id: Set(reporter_id.map(str::to_string)),
            status: Set(ReportStatus::Pending),
            created_at: Set(Utc::now().into()),
            resolved_by: Set(None),
            resolved_at: Set(None),
        };

        let report = self.report_repo.create(model).await?;

        info!(
            report_id = %report.id,
            target_id = %report.target_id,
            target_type = %report.target_type,
            "Report filed"
        );

        Ok(report)
    }

    /// Pending reports, newest first.
    pub async fn list_pending(&self) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_pending().await
    }

    /// Reports in any state, optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_status(status, limit, offset).await
    }

    pub async fn get_report(&self, report_id: &str) -> AppResult<report::Model> {
        self.report_repo.get_by_id(report_id).await
    }

    pub async fn count_pending(&self) -> AppResult<u64> {
        self.report_repo.count_pending().await
    }

    /// Every report filed against one piece of content.
    pub async fn list_for_target(&self, target_id: &str) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_target(target_id).await
    }

    /// Close a pending report.
    ///
    /// A report that is no longer pending is left as it is and the call
    /// fails with `Conflict`; the first outcome recorded stands.
    pub async fn resolve(
        &self,
        report_id: &str,
        outcome: ReportStatus,
        admin_id: &str,
    ) -> AppResult<report::Model> {
        if !outcome.is_terminal() {
            return Err(AppError::BadRequest(
                "Outcome must be resolved or dismissed".to_string(),
            ));
        }

        let report = self.report_repo.get_by_id(report_id).await?;
        if report.status.is_terminal() {
            return Err(already_closed(&report));
        }

        let now = Utc::now().into();
        if !self
            .report_repo
            .close_pending(report_id, outcome, admin_id, now)
            .await?
        {
            // Closed by someone else between the read and the update.
            let current = self.report_repo.get_by_id(report_id).await?;
            return Err(already_closed(&current));
        }

        info!(report_id = %report_id, admin_id = %admin_id, outcome = ?outcome, "Report closed");

        Ok(report::Model {
            status: outcome,
            resolved_by: Some(admin_id.to_string()),
            resolved_at: Some(now),
            ..report
        })
    }
}

fn already_closed(report: &report::Model) -> AppError {
    AppError::Conflict(format!(
        "Report {} is already {:?}",
        report.id, report.status
    ))
}
